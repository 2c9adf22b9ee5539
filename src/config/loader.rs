//! Configuration loading from disk and the environment.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value '{value}' for environment variable {var}")]
    Env { var: &'static str, value: String },
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

/// Load configuration from an optional TOML file, apply environment
/// overrides, then validate.
pub fn load_config(path: Option<&Path>) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => parse_file(path)?,
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Parse a TOML file without validating it.
pub fn parse_file(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Apply environment-style overrides read through `lookup`.
///
/// Recognised variables:
/// - `PORT` - replaces the port of `listener.bind_address`
/// - `API_KEY` - pre-shared key
/// - `API_USERNAME` / `API_PASSWORD` - basic-auth pair
/// - `WIMBLEDON_DATASET` - path of the CSV backing store
/// - `WIMBLEDON_AUTH_ENABLED` - `true`/`1` or `false`/`0`
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = lookup("PORT") {
        let port = value
            .trim()
            .parse::<u16>()
            .map_err(|_| ConfigError::Env { var: "PORT", value })?;
        set_port(config, port);
    }

    if let Some(key) = lookup("API_KEY") {
        config.auth.api_key = Some(key);
    }
    if let Some(username) = lookup("API_USERNAME") {
        config.auth.username = Some(username);
    }
    if let Some(password) = lookup("API_PASSWORD") {
        config.auth.password = Some(password);
    }

    if let Some(path) = lookup("WIMBLEDON_DATASET") {
        config.dataset.path = PathBuf::from(path);
    }

    if let Some(value) = lookup("WIMBLEDON_AUTH_ENABLED") {
        config.auth.enabled = match value.trim().to_ascii_lowercase().as_str() {
            "true" | "1" => true,
            "false" | "0" => false,
            _ => {
                return Err(ConfigError::Env {
                    var: "WIMBLEDON_AUTH_ENABLED",
                    value,
                })
            }
        };
    }

    Ok(())
}

/// Replace the port component of the listener address, keeping the host.
pub fn set_port(config: &mut ServiceConfig, port: u16) {
    let address = &config.listener.bind_address;
    let host = match address.rsplit_once(':') {
        Some((host, _)) => host,
        None => address.as_str(),
    };
    config.listener.bind_address = format!("{host}:{port}");
}
