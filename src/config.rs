//! Configuration loaded from `sqlra.toml`.
//!
//! ```toml
//! [output]
//! format = "json"
//! pretty = true
//!
//! [repl]
//! history_file = "/tmp/sqlra_history"
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{SqlraError, SqlraResult};

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG: &str = "sqlra.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub output: OutputConfig,
    pub repl: ReplConfig,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Indented tree instead of one line.
    pub pretty: bool,
    pub color: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            pretty: false,
            color: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    pub history: bool,
    pub history_file: Option<PathBuf>,
    pub prompt: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            history: true,
            history_file: None,
            prompt: "sqlra> ".to_string(),
        }
    }
}

impl ReplConfig {
    /// History file, defaulting to `~/.sqlra_history`. `None` when
    /// history is disabled or there is no home directory.
    pub fn history_path(&self) -> Option<PathBuf> {
        if !self.history {
            return None;
        }
        self.history_file
            .clone()
            .or_else(|| dirs::home_dir().map(|p| p.join(".sqlra_history")))
    }
}

impl Config {
    /// Parse a config from TOML text.
    pub fn from_toml(content: &str) -> SqlraResult<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file that must exist.
    pub fn from_file(path: &Path) -> SqlraResult<Self> {
        if !path.exists() {
            return Err(SqlraError::config(format!(
                "config file not found: {}",
                path.display()
            )));
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load the effective config.
    ///
    /// An explicit path must exist. Otherwise `./sqlra.toml`, then
    /// `<config dir>/sqlra/config.toml`, then built-in defaults.
    pub fn load(explicit: Option<&Path>) -> SqlraResult<Self> {
        if let Some(path) = explicit {
            tracing::debug!("Loading config from {}", path.display());
            return Self::from_file(path);
        }

        for path in Self::search_paths() {
            if path.exists() {
                tracing::debug!("Loading config from {}", path.display());
                return Self::from_file(&path);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Implicit config locations, in lookup order.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("sqlra").join("config.toml"));
        }
        paths
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.output.color);
        assert_eq!(config.repl.prompt, "sqlra> ");
    }

    #[test]
    fn test_partial_config() {
        let config = Config::from_toml(
            r#"
            [output]
            format = "json"
            pretty = true

            [repl]
            history = false
            "#,
        )
        .unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);
        assert!(config.output.pretty);
        assert!(config.output.color);
        assert!(!config.repl.history);
        assert_eq!(config.repl.history_path(), None);
    }

    #[test]
    fn test_explicit_history_file() {
        let config = Config::from_toml("[repl]\nhistory_file = \"/tmp/h\"\n").unwrap();
        assert_eq!(config.repl.history_path(), Some(PathBuf::from("/tmp/h")));
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("[output]\nformat = \"yaml\"\n").unwrap_err();
        assert!(matches!(err, SqlraError::Toml(_)));
    }

    #[test]
    fn test_load_explicit_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[output]\npretty = true").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, SqlraError::Config(_)));
    }
}
