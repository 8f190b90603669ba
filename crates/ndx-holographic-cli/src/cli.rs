//! CLI argument definitions using clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::logging::LogFormat;

#[derive(Parser)]
#[command(name = "ndx-holo")]
#[command(author, version, about = "Inspect and validate holographic stimulation documents", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Skip stored nodes the schema does not declare instead of failing
    #[arg(long, global = true)]
    pub lenient: bool,

    /// Log level filter, e.g. `debug` or `ndx_schema=trace` (RUST_LOG wins)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format
    #[arg(long, global = true, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Don't load configuration file
    #[arg(long, global = true)]
    pub no_config: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a JSON document and check the whole tree
    Validate {
        /// Document written by a MemoryStore
        file: PathBuf,
    },

    /// Print the container tree of a JSON document
    Inspect {
        file: PathBuf,

        /// Emit a JSON summary instead of a tree
        #[arg(long)]
        json: bool,
    },

    /// List registered types
    Types {
        /// Only types owned by this namespace
        #[arg(short, long)]
        namespace: Option<String>,
    },

    /// Show the effective fields of a type
    Describe {
        #[arg(value_name = "TYPE")]
        type_name: String,
    },

    /// Print a loaded namespace descriptor
    Namespace {
        name: String,

        #[arg(short, long, value_enum, default_value = "yaml")]
        format: DescriptorFormat,
    },

    /// Configuration file management
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Show configuration file path
    Path,
    /// Initialize default configuration file
    Init,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DescriptorFormat {
    Yaml,
    Json,
}
