//! Configuration loading from disk.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::AdapterConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable that overrides the configured mode.
pub const MODE_ENV: &str = "EDGE_ADAPTER_MODE";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AdapterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse, apply environment overrides, and validate.
pub fn parse_config(content: &str) -> Result<AdapterConfig, ConfigError> {
    let mut config: AdapterConfig = toml::from_str(content)?;
    apply_env_overrides(&mut config, std::env::var(MODE_ENV).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Defaults plus environment overrides, for running without a file.
pub fn default_config() -> Result<AdapterConfig, ConfigError> {
    parse_config("")
}

fn apply_env_overrides(config: &mut AdapterConfig, mode: Option<String>) {
    if let Some(mode) = mode.filter(|m| !m.is_empty()) {
        tracing::debug!(mode = %mode, "Mode overridden from environment");
        config.mode = mode;
    }
}
