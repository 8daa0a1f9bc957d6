//! Configuration loading utilities

use crate::Config;
use movdash_common::{MovDashError, Result as MovDashResult};
use std::env;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable pointing at an explicit configuration file
pub const CONFIG_PATH_ENV: &str = "MOVDASH_CONFIG_PATH";

/// Files probed in the working directory when no path is given
pub const DEFAULT_CONFIG_FILES: &[&str] = &["movdash.yaml", "movdash.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for MovDashError {
    fn from(err: ConfigError) -> Self {
        MovDashError::config_with_source(err.to_string(), err)
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        Self::load_config_with(path, |key| env::var(key).ok())
    }

    /// Like [`ConfigLoader::load_config`], reading overrides through `lookup`
    pub fn load_config_with<P, F>(path: P, lookup: F) -> Result<Config, ConfigError>
    where
        P: AsRef<Path>,
        F: Fn(&str) -> Option<String>,
    {
        debug!("Reading configuration from {}", path.as_ref().display());
        let content = std::fs::read_to_string(path.as_ref())?;
        // An empty file is a valid, all-defaults configuration
        let mut config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(&content)?
        };

        Self::apply_overrides_from(&mut config, lookup)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from `MOVDASH_CONFIG_PATH`, then `movdash.yaml` or
    /// `movdash.yml`, falling back to defaults with environment overrides
    pub fn load() -> MovDashResult<Config> {
        let config = if let Ok(config_path) = env::var(CONFIG_PATH_ENV) {
            Self::load_config(&config_path)?
        } else if let Some(path) = DEFAULT_CONFIG_FILES
            .iter()
            .find(|candidate| Path::new(candidate).exists())
        {
            Self::load_config(path)?
        } else {
            info!("No configuration file found, using defaults");
            Self::defaults_with(|key| env::var(key).ok())?
        };

        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> MovDashResult<Config> {
        Ok(Self::load_config(path)?)
    }

    /// Built-in defaults with overrides read through `lookup`
    pub fn defaults_with<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        Self::apply_overrides_from(&mut config, lookup)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Apply `MOVDASH_*` overrides, reading each variable through `lookup`
    pub fn apply_overrides_from<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Source configuration overrides
        if let Some(path) = lookup("MOVDASH_INPUT") {
            config.source.path = path;
        }

        if let Some(sheet) = lookup("MOVDASH_SHEET") {
            config.source.sheet = Some(sheet).filter(|s| !s.trim().is_empty());
        }

        if let Some(column) = lookup("MOVDASH_TIMESTAMP_COLUMN") {
            config.source.timestamp_column = column;
        }

        if let Some(column) = lookup("MOVDASH_ACTION_COLUMN") {
            config.source.action_column = column;
        }

        // Graph configuration overrides
        if let Some(width) = lookup("MOVDASH_GRAPH_WIDTH") {
            config.graph.width = parse_var("MOVDASH_GRAPH_WIDTH", &width)?;
        }

        if let Some(height) = lookup("MOVDASH_GRAPH_HEIGHT") {
            config.graph.height = parse_var("MOVDASH_GRAPH_HEIGHT", &height)?;
        }

        if let Some(format) = lookup("MOVDASH_GRAPH_FORMAT") {
            config.graph.format = parse_var("MOVDASH_GRAPH_FORMAT", &format)?;
        }

        if let Some(output) = lookup("MOVDASH_OUTPUT") {
            config.graph.output = Some(output);
        }

        // Logging configuration overrides
        if let Some(level) = lookup("MOVDASH_LOG_LEVEL") {
            config.logging.level = level.to_ascii_lowercase();
        }

        if let Some(file) = lookup("MOVDASH_LOG_FILE") {
            config.logging.file = Some(file);
        }

        if let Some(format) = lookup("MOVDASH_LOG_FORMAT") {
            config.logging.format = parse_var("MOVDASH_LOG_FORMAT", &format)?;
        }

        Ok(())
    }
}

fn parse_var<T>(var: &str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value.trim().parse().map_err(|e| ConfigError::EnvParseError {
        var: var.to_string(),
        source: Box::new(e),
    })
}
