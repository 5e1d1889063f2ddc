//! Logging system
//!
//! Structured logging built on the `tracing` crate. Level and format come
//! from configuration, with the `XMLFUSE_LOG` environment variable taking
//! precedence over the configured level when set.

use crate::config::ConfigError;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: text or json
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "text".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

/// Environment variable overriding the configured filter.
const ENV_FILTER_VAR: &str = "XMLFUSE_LOG";

/// Initialize the logging system. Call once per process, before any
/// engine work; logs go to stderr so merged output can go to stdout.
pub fn init_logging(config: &LoggingConfig) -> Result<(), ConfigError> {
    let filter = match std::env::var(ENV_FILTER_VAR) {
        Ok(spec) => {
            EnvFilter::try_new(&spec).map_err(|_| ConfigError::InvalidLogLevel(spec.clone()))?
        }
        Err(_) => EnvFilter::try_new(&config.level)
            .map_err(|_| ConfigError::InvalidLogLevel(config.level.clone()))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match config.format.as_str() {
        "json" => builder
            .json()
            .try_init()
            .map_err(|e| ConfigError::LoggingInit(e.to_string())),
        "text" => builder
            .try_init()
            .map_err(|e| ConfigError::LoggingInit(e.to_string())),
        other => Err(ConfigError::InvalidLogFormat(other.to_string())),
    }
}
