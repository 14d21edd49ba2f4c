//! Compiler configuration
//!
//! Naming knobs for the script target. Loaded from TOML:
//!
//! ```toml
//! variable_prefix = "$var"
//! receiver = "$this"
//! label_prefix = "label_"
//! ```

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Error while loading a configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Naming configuration for lowered output
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CompilerConfig {
    /// Prefix of generated variable names (default: `$var`)
    pub variable_prefix: String,
    /// Name of the implicit receiver binding (default: `$this`)
    pub receiver: String,
    /// Prefix of generated label names (default: `label_`)
    pub label_prefix: String,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            variable_prefix: "$var".to_string(),
            receiver: "$this".to_string(),
            label_prefix: "label_".to_string(),
        }
    }
}

impl CompilerConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&source)
    }
}
