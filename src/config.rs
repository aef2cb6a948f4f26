use crate::logging;
use crate::{Result, StubError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

/// Default configuration file name
pub const DEFAULT_CONFIG_FILE: &str = ".callstub.toml";

/// Environment variable overriding the configuration path
pub const CONFIG_PATH_ENV: &str = "CALLSTUB_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub mock: MockConfig,
    #[serde(default)]
    pub verification: VerificationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct MockConfig {
    /// Do not seed default expectations; unstubbed calls fail
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VerificationConfig {
    /// How many recorded calls a failed assertion lists
    #[serde(default = "default_max_listed_calls")]
    pub max_listed_calls: usize,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            max_listed_calls: default_max_listed_calls(),
        }
    }
}

fn default_max_listed_calls() -> usize {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Fallback level when `CALLSTUB_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Config {
    /// Load configuration from `CALLSTUB_CONFIG` or `.callstub.toml`.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        match std::env::var(CONFIG_PATH_ENV) {
            Ok(path) => Self::load_from(path),
            Err(_) => Self::load_from(DEFAULT_CONFIG_FILE),
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config_path = path.as_ref();

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(config_path).map_err(|e| {
            StubError::Config(format!(
                "Failed to read config file {:?}: {}",
                config_path, e
            ))
        })?;

        let config = Self::parse(&content).map_err(|e| match e {
            StubError::Config(msg) => {
                StubError::Config(format!("{} (in {:?})", msg, config_path))
            }
            other => other,
        })?;

        logging::log_config_loaded(&config_path.display().to_string());
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| StubError::Config(format!("Failed to parse TOML config: {}", e)))
    }

    /// Load config, falling back to defaults when the file is unreadable
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to load config: {}. Using defaults.", e);
                Config::default()
            }
        }
    }
}
