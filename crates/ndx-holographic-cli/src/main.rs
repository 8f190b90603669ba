//! ndx-holo - inspect and validate holographic stimulation documents
//!
//! Documents are JSON files written by `ndx_schema::io::MemoryStore`. Every
//! command works against the namespaces bundled with
//! `ndx-holographic-stimulation`.

mod cli;
mod config;
mod logging;
mod output;

use anyhow::{bail, Context, Result};
use clap::Parser;
use ndx_holographic_stimulation::load_namespaces;
use ndx_schema::io::{read_with, MemoryStore, UnknownNodePolicy};
use ndx_schema::{ContainerId, ContainerTree, TreeValidator, TypeRegistry};
use std::path::Path;
use tracing::{debug, warn};

use cli::{Cli, Commands, ConfigCommand, DescriptorFormat};
use config::Config;
use output::{enable_colors, print_error, print_header, print_info, print_report, print_success};

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let (mut config, config_error) = if cli.no_config {
        (Config::default(), None)
    } else {
        match Config::discover() {
            Ok(config) => (config, None),
            Err(e) => (Config::default(), Some(e)),
        }
    };

    if cli.lenient {
        config.read.unknown_nodes = UnknownNodePolicy::Warn;
    }
    if let Some(level) = &cli.log_level {
        config.log.level = level.clone();
    }
    if let Some(format) = cli.log_format {
        config.log.format = format;
    }
    if cli.no_color {
        config.colored = false;
    }

    enable_colors(config.colored);
    logging::init(config.log.format, &config.log.level)?;
    if let Some(e) = config_error {
        warn!("Ignoring configuration file: {:#}", e);
    }

    if let Commands::Config { command } = &cli.command {
        return handle_config_command(command);
    }

    let registry = load_namespaces().context("Failed to load the bundled namespaces")?;
    match &cli.command {
        Commands::Validate { file } => validate(file, &registry, &config),
        Commands::Inspect { file, json } => inspect(file, &registry, &config, *json),
        Commands::Types { namespace } => list_types(&registry, namespace.as_deref()),
        Commands::Describe { type_name } => {
            let resolved = registry
                .resolve(type_name)
                .with_context(|| format!("Cannot describe '{}'", type_name))?;
            for line in output::type_lines(&resolved) {
                println!("{}", line);
            }
            Ok(())
        }
        Commands::Namespace { name, format } => {
            let namespace = registry
                .namespace(name)
                .with_context(|| format!("Namespace '{}' is not loaded", name))?;
            let text = match format {
                DescriptorFormat::Yaml => namespace.to_yaml()?,
                DescriptorFormat::Json => namespace.to_json()?,
            };
            println!("{}", text.trim_end());
            Ok(())
        }
        Commands::Config { .. } => Ok(()),
    }
}

fn open(file: &Path, registry: &TypeRegistry, config: &Config) -> Result<(ContainerTree, ContainerId)> {
    let store = MemoryStore::open(file)
        .with_context(|| format!("Failed to open document: {}", file.display()))?;
    let (tree, root) = read_with(&store, registry, config.read_options())
        .with_context(|| format!("Failed to read document: {}", file.display()))?;
    debug!(path = %file.display(), containers = tree.len(), "Read document");
    Ok((tree, root))
}

fn validate(file: &Path, registry: &TypeRegistry, config: &Config) -> Result<()> {
    let (tree, root) = open(file, registry, config)?;
    let report = TreeValidator::new(&tree, root).validate();
    print_report(&report);
    if !report.is_valid() {
        bail!("{} failed validation with {} error(s)", file.display(), report.errors.len());
    }
    print_success(&format!("{} is valid ({} containers)", file.display(), tree.len()));
    Ok(())
}

fn inspect(file: &Path, registry: &TypeRegistry, config: &Config, json: bool) -> Result<()> {
    let (tree, root) = open(file, registry, config)?;
    if json {
        let summary = output::tree_json(&tree, root);
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }
    print_header(&file.display().to_string());
    for line in output::tree_lines(&tree, root) {
        println!("{}", line);
    }
    Ok(())
}

fn list_types(registry: &TypeRegistry, namespace: Option<&str>) -> Result<()> {
    if let Some(name) = namespace {
        if registry.namespace(name).is_none() {
            bail!("Namespace '{}' is not loaded", name);
        }
    }
    let mut types: Vec<_> = registry
        .types()
        .filter(|t| namespace.map_or(true, |ns| t.namespace == ns))
        .collect();
    types.sort_by(|a, b| (&a.namespace, &a.name).cmp(&(&b.namespace, &b.name)));

    for resolved in types {
        let parent = resolved.ancestry.iter().rev().nth(1);
        match parent {
            Some(parent) => println!("{:<28} {:<30} extends {}", resolved.name, resolved.namespace, parent),
            None => println!("{:<28} {}", resolved.name, resolved.namespace),
        }
    }
    Ok(())
}

fn handle_config_command(command: &ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let config = Config::load_default();
            println!("{}", toml::to_string_pretty(&config)?);
        }
        ConfigCommand::Path => {
            println!("{}", Config::config_path().display());
        }
        ConfigCommand::Init => {
            let path = Config::config_path();
            if path.exists() {
                print_info(&format!("Config file already exists: {}", path.display()));
                return Ok(());
            }
            let path = Config::create_default()?;
            print_success(&format!("Created config file: {}", path.display()));
        }
    }
    Ok(())
}
