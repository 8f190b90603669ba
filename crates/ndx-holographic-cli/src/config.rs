//! Configuration file support for the ndx-holo CLI
//!
//! Supports loading configuration from .ndxholorc files in:
//! - Custom path via environment variable
//! - Current directory
//! - User home directory

use anyhow::{Context, Result};
use ndx_schema::io::{ReadOptions, UnknownNodePolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::logging::LogFormat;

const FILE_NAME: &str = ".ndxholorc";
const ENV_VAR: &str = "NDX_HOLO_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Enable colored output
    pub colored: bool,

    pub read: ReadConfig,

    pub log: LogConfig,
}

/// How documents are read back.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadConfig {
    /// `error` or `warn` for stored nodes the schema does not declare
    pub unknown_nodes: UnknownNodePolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when RUST_LOG is unset
    pub level: String,

    pub format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            colored: true,
            read: ReadConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: LogFormat::Compact,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    /// Find and load the first configuration file present
    ///
    /// Search order:
    /// 1. NDX_HOLO_CONFIG environment variable
    /// 2. .ndxholorc in current directory
    /// 3. .ndxholorc in user home directory
    ///
    /// A file that exists but cannot be read or parsed is an error.
    pub fn discover() -> Result<Self> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var(ENV_VAR) {
            candidates.push(PathBuf::from(path));
        }
        candidates.push(PathBuf::from(FILE_NAME));
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(FILE_NAME));
        }
        Self::discover_in(&candidates)
    }

    fn discover_in(candidates: &[PathBuf]) -> Result<Self> {
        match candidates.iter().find(|path| path.exists()) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Like [`Config::discover`], falling back to defaults with a warning
    pub fn load_default() -> Self {
        Self::discover().unwrap_or_else(|e| {
            warn!("Ignoring configuration file: {:#}", e);
            Self::default()
        })
    }

    /// Get configuration file path (current or home)
    pub fn config_path() -> PathBuf {
        let current = PathBuf::from(FILE_NAME);
        if current.exists() {
            return current;
        }

        match dirs::home_dir() {
            Some(home) => home.join(FILE_NAME),
            None => current,
        }
    }

    /// Create a default configuration file
    pub fn create_default() -> Result<PathBuf> {
        let path = Self::config_path();
        Self::default().save(&path)?;
        Ok(path)
    }

    /// Reader options derived from the `[read]` section
    pub fn read_options(&self) -> ReadOptions {
        ReadOptions {
            unknown_nodes: self.read.unknown_nodes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.colored);
        assert_eq!(config.read.unknown_nodes, UnknownNodePolicy::Error);
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.read_options(), ReadOptions::default());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str("[read]\nunknown_nodes = \"warn\"\n").unwrap();
        assert_eq!(config.read_options(), ReadOptions::lenient());
        assert_eq!(config.log, LogConfig::default());
        assert!(config.colored);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);

        let mut config = Config::default();
        config.colored = false;
        config.log.format = LogFormat::Json;
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn test_discover_takes_first_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let present = dir.path().join(FILE_NAME);
        fs::write(&present, "colored = false\n").unwrap();

        let config = Config::discover_in(&[missing.clone(), present]).unwrap();
        assert!(!config.colored);
        assert_eq!(Config::discover_in(&[missing]).unwrap(), Config::default());
    }

    #[test]
    fn test_discover_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken");
        let valid = dir.path().join(FILE_NAME);
        fs::write(&broken, "colored = \"sometimes\"\n").unwrap();
        fs::write(&valid, "colored = false\n").unwrap();

        assert!(Config::discover_in(&[broken, valid]).is_err());
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(FILE_NAME);
        fs::write(&path, "[log]\nformat = \"xml\"\n").unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }
}
