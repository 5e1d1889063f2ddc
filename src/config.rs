//! Configuration for the merge engine.
//!
//! Defaults match the engine's built-in behavior; a TOML file can override
//! individual fields. The logging section feeds the tracing setup.

use crate::logging::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Unreadable(#[from] std::io::Error),

    #[error("invalid config file: {0}")]
    Invalid(#[from] toml::de::Error),

    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("invalid log format: {0}")]
    InvalidLogFormat(String),

    #[error("failed to initialize logging: {0}")]
    LoggingInit(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    /// Suffix a file must carry to qualify for a directory import
    #[serde(default = "default_document_suffix")]
    pub document_suffix: String,

    /// Directory-import files whose name starts with this prefix are skipped
    #[serde(default = "default_reserved_prefix")]
    pub reserved_prefix: String,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_document_suffix() -> String {
    ".xml".to_string()
}

fn default_reserved_prefix() -> String {
    "new".to_string()
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            document_suffix: default_document_suffix(),
            reserved_prefix: default_reserved_prefix(),
            logging: LoggingConfig::default(),
        }
    }
}

impl MergeConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }
}
