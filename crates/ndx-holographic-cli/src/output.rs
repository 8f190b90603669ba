//! Colored output formatting for the ndx-holo CLI

use colored::*;
use ndx_schema::{ContainerId, ContainerTree, FieldSpec, ResolvedType, TypedContainer, ValidationReport};
use serde_json::json;

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_error(message: &str) {
    eprintln!("{} {}", "✗".red().bold(), message);
}

pub fn print_warning(message: &str) {
    eprintln!("{} {}", "!".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

pub fn print_header(title: &str) {
    println!("\n{}", title.cyan().bold());
    println!("{}", "=".repeat(title.chars().count()).cyan());
}

pub fn enable_colors(enabled: bool) {
    colored::control::set_override(enabled);
}

/// One-line contract of a field: kind, shape or target, and presence.
pub fn field_summary(field: &FieldSpec) -> String {
    match field {
        FieldSpec::Attribute(a) => {
            let presence = if a.required { "required" } else { "optional" };
            match &a.default_value {
                Some(default) => format!("{} {} (default {})", a.dtype, presence, default),
                None => format!("{} {}", a.dtype, presence),
            }
        }
        FieldSpec::Dataset(d) => match &d.shape {
            Some(shape) => format!("{} {} {}", d.dtype, shape, d.quantity),
            None => format!("{} {}", d.dtype, d.quantity),
        },
        FieldSpec::Link(l) => format!("-> {} {}", l.target_type, l.quantity),
        FieldSpec::Group(g) => format!("{} {}", g.target_type, g.quantity),
    }
}

pub fn type_lines(resolved: &ResolvedType) -> Vec<String> {
    let mut lines = vec![
        format!("{} ({} {})", resolved.name, resolved.namespace, resolved.namespace_version),
        format!("inherits: {}", resolved.ancestry.join(" > ")),
    ];
    if !resolved.doc.is_empty() {
        lines.push(resolved.doc.clone());
    }
    for field in resolved.fields.values() {
        lines.push(format!(
            "  {:<24} {:<9} {}",
            field.name(),
            field.category(),
            field_summary(field)
        ));
    }
    lines
}

/// Indented listing of everything `root` owns, with link targets as paths.
pub fn tree_lines(tree: &ContainerTree, root: ContainerId) -> Vec<String> {
    let mut lines = Vec::new();
    if let Some(container) = tree.get(root) {
        lines.push(format!("/ ({})", container.type_name()));
        push_links(tree, container, 1, &mut lines);
        push_children(tree, container, 1, &mut lines);
    }
    lines
}

fn push_children(tree: &ContainerTree, container: &TypedContainer, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for (relation, children) in container.relations() {
        lines.push(format!("{}{}/", indent, relation));
        for (name, id) in children {
            let Some(child) = tree.get(*id) else {
                continue;
            };
            lines.push(format!("{}  {} ({})", indent, name, child.type_name()));
            push_links(tree, child, depth + 2, lines);
            push_children(tree, child, depth + 2, lines);
        }
    }
}

fn push_links(tree: &ContainerTree, container: &TypedContainer, depth: usize, lines: &mut Vec<String>) {
    let indent = "  ".repeat(depth);
    for (field, target) in container.links() {
        if target.ids().is_empty() {
            continue;
        }
        let paths: Vec<String> = target.ids().iter().map(|id| tree.path(*id)).collect();
        lines.push(format!("{}{} -> {}", indent, field, paths.join(", ")));
    }
}

pub fn tree_json(tree: &ContainerTree, root: ContainerId) -> serde_json::Value {
    let containers: Vec<serde_json::Value> = tree
        .descendants(root)
        .into_iter()
        .filter_map(|id| {
            tree.get(id).map(|c| {
                json!({
                    "path": tree.path(id),
                    "type": c.type_name(),
                    "namespace": c.resolved().namespace,
                })
            })
        })
        .collect();
    json!({
        "root": tree.get(root).map(|c| c.type_name()),
        "containers": containers,
    })
}

pub fn print_report(report: &ValidationReport) {
    for error in &report.errors {
        print_error(error);
    }
    for warning in &report.warnings {
        print_warning(warning);
    }
    for hint in &report.hints {
        print_info(hint);
    }
}
