//! Whole-tree checks.
//!
//! Construction validates one container at a time. [`TreeValidator`] looks at
//! the relationships between containers once a tree has been assembled.

use std::collections::HashSet;

use crate::container::{ContainerId, ContainerTree};
use crate::value::DatasetData;

/// Validation results with errors, warnings, and hints
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub hints: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    pub fn add_hint(&mut self, hint: impl Into<String>) {
        self.hints.push(hint.into());
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_issues(&self) -> bool {
        !self.errors.is_empty() || !self.warnings.is_empty()
    }
}

/// Checks a tree as it would be written from `root`.
pub struct TreeValidator<'a> {
    tree: &'a ContainerTree,
    root: ContainerId,
}

impl<'a> TreeValidator<'a> {
    pub fn new(tree: &'a ContainerTree, root: ContainerId) -> Self {
        Self { tree, root }
    }

    pub fn validate(&self) -> ValidationReport {
        let mut report = ValidationReport::new();
        let Some(root) = self.tree.get(self.root) else {
            report.add_error(format!("Root {} is not in this tree", self.root));
            return report;
        };
        if root.parent().is_some() {
            report.add_warning(format!(
                "Root '{}' is owned by another container; only its subtree is checked",
                root.name()
            ));
        }

        let reachable: HashSet<ContainerId> = self.tree.descendants(self.root).into_iter().collect();
        self.check_links(&reachable, &mut report);
        self.check_slots(&reachable, &mut report);
        self.check_unattached(&reachable, &mut report);
        self.check_deferred(&reachable, &mut report);
        report
    }

    fn check_links(&self, reachable: &HashSet<ContainerId>, report: &mut ValidationReport) {
        for id in self.tree.descendants(self.root) {
            let Some(container) = self.tree.get(id) else {
                continue;
            };
            for (field, target) in container.links() {
                for target_id in target.ids() {
                    match self.tree.get(*target_id) {
                        None => report.add_error(format!(
                            "{}: link '{}' points to a missing container",
                            self.tree.path(id),
                            field
                        )),
                        Some(t) if !reachable.contains(target_id) => report.add_error(format!(
                            "{}: link '{}' points to '{}' which is outside the tree",
                            self.tree.path(id),
                            field,
                            t.name()
                        )),
                        Some(_) => {}
                    }
                }
            }
        }
    }

    fn check_slots(&self, reachable: &HashSet<ContainerId>, report: &mut ValidationReport) {
        for id in reachable {
            let Some(container) = self.tree.get(*id) else {
                continue;
            };
            for slot in container.resolved().child_slots() {
                let count = container.children(&slot.name).count();
                if !slot.quantity.accepts_count(count) {
                    report.add_error(format!(
                        "{}: '{}' is {} but holds {} children",
                        self.tree.path(*id),
                        slot.name,
                        slot.quantity,
                        count
                    ));
                }
            }
        }
    }

    fn check_unattached(&self, reachable: &HashSet<ContainerId>, report: &mut ValidationReport) {
        let linked: HashSet<ContainerId> = reachable
            .iter()
            .filter_map(|id| self.tree.get(*id))
            .flat_map(|c| c.links().flat_map(|(_, t)| t.ids().to_vec()).collect::<Vec<_>>())
            .collect();

        for (id, container) in self.tree.iter() {
            if reachable.contains(&id) || container.parent().is_some() {
                continue;
            }
            if linked.contains(&id) {
                continue;
            }
            report.add_warning(format!(
                "{} '{}' is not attached under the root and will not be written",
                container.type_name(),
                container.name()
            ));
        }
    }

    fn check_deferred(&self, reachable: &HashSet<ContainerId>, report: &mut ValidationReport) {
        for id in reachable {
            let Some(container) = self.tree.get(*id) else {
                continue;
            };
            for (field, value) in container.datasets() {
                if let DatasetData::Deferred(d) = &value.data {
                    report.add_hint(format!(
                        "{}/{}: deferred array with {} chunks is checked in full when written",
                        self.tree.path(*id),
                        field,
                        d.num_chunks()
                    ));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::FieldValues;
    use crate::spec::{GroupSpec, LinkSpec, TypeSpec};
    use crate::{FieldCardinality, NamespaceBuilder, TypeRegistry};

    fn registry() -> TypeRegistry {
        let ns = NamespaceBuilder::new("lab", "1.0.0")
            .type_spec(TypeSpec::group("Device"))
            .type_spec(TypeSpec::group("Site").link(LinkSpec::new("device", "Device")))
            .type_spec(
                TypeSpec::group("File")
                    .child(GroupSpec::new("devices", "Device").with_quantity(FieldCardinality::ZeroOrMore))
                    .child(GroupSpec::new("sites", "Site").with_quantity(FieldCardinality::ZeroOrMore)),
            )
            .build()
            .unwrap();
        let mut registry = TypeRegistry::new();
        registry.register(ns).unwrap();
        registry
    }

    #[test]
    fn test_valid_tree() {
        let registry = registry();
        let mut tree = ContainerTree::new();
        let device = tree.construct(&registry, "Device", "laser", FieldValues::new()).unwrap();
        let site = tree
            .construct(&registry, "Site", "site", FieldValues::new().link("device", device))
            .unwrap();
        let file = tree
            .construct(
                &registry,
                "File",
                "root",
                FieldValues::new().children("devices", vec![device]).children("sites", vec![site]),
            )
            .unwrap();

        let report = TreeValidator::new(&tree, file).validate();
        assert!(report.is_valid(), "{:?}", report.errors);
        assert!(!report.has_issues());
    }

    #[test]
    fn test_link_escaping_tree() {
        let registry = registry();
        let mut tree = ContainerTree::new();
        let device = tree.construct(&registry, "Device", "laser", FieldValues::new()).unwrap();
        let site = tree
            .construct(&registry, "Site", "site", FieldValues::new().link("device", device))
            .unwrap();
        let file = tree
            .construct(&registry, "File", "root", FieldValues::new().children("sites", vec![site]))
            .unwrap();

        let report = TreeValidator::new(&tree, file).validate();
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("outside the tree"));
    }

    #[test]
    fn test_unattached_warning() {
        let registry = registry();
        let mut tree = ContainerTree::new();
        tree.construct(&registry, "Device", "stray", FieldValues::new()).unwrap();
        let file = tree.construct(&registry, "File", "root", FieldValues::new()).unwrap();

        let report = TreeValidator::new(&tree, file).validate();
        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("stray"));
    }
}
