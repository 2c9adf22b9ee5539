//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, address parses)
//! - Check that the auth gate has something to compare against
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;

/// A single semantic problem with a configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be > 0"));
    }

    if config.dataset.path.as_os_str().is_empty() {
        errors.push(ValidationError::new("dataset.path", "must not be empty"));
    }

    let producer = &config.dataset.producer;
    if producer.enabled {
        if producer.program.trim().is_empty() {
            errors.push(ValidationError::new(
                "dataset.producer.program",
                "must not be empty when the producer is enabled",
            ));
        }
        if producer.timeout_secs == 0 {
            errors.push(ValidationError::new(
                "dataset.producer.timeout_secs",
                "must be > 0",
            ));
        } else if config.timeouts.request_secs <= producer.timeout_secs {
            errors.push(ValidationError::new(
                "timeouts.request_secs",
                format!(
                    "must exceed dataset.producer.timeout_secs ({})",
                    producer.timeout_secs
                ),
            ));
        }
    }

    let auth = &config.auth;
    match (&auth.username, &auth.password) {
        (Some(_), None) => errors.push(ValidationError::new(
            "auth.password",
            "required when auth.username is set",
        )),
        (None, Some(_)) => errors.push(ValidationError::new(
            "auth.username",
            "required when auth.password is set",
        )),
        _ => {}
    }
    if auth.api_key.as_deref() == Some("") {
        errors.push(ValidationError::new("auth.api_key", "must not be empty"));
    }
    if auth.enabled && auth.api_key.is_none() && (auth.username.is_none() || auth.password.is_none())
    {
        errors.push(ValidationError::new(
            "auth",
            "enabled but neither an API key nor a username/password pair is configured",
        ));
    }

    let metrics_path = config.observability.metrics_path.as_str();
    if config.observability.metrics_enabled {
        if !metrics_path.starts_with('/') {
            errors.push(ValidationError::new(
                "observability.metrics_path",
                "must start with '/'",
            ));
        } else if is_api_route(metrics_path) {
            errors.push(ValidationError::new(
                "observability.metrics_path",
                format!("'{metrics_path}' collides with an API route"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Paths served by the API itself, including everything below `/wimbledon`.
fn is_api_route(path: &str) -> bool {
    let path = path.trim_end_matches('/');
    path == "/health" || path == "/wimbledon" || path.starts_with("/wimbledon/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed() -> ServiceConfig {
        let mut config = ServiceConfig::default();
        config.auth.api_key = Some("secret".into());
        config
    }

    #[test]
    fn test_defaults_with_key_are_valid() {
        assert!(validate_config(&keyed()).is_ok());
    }

    #[test]
    fn test_auth_enabled_without_credentials_is_rejected() {
        let errors = validate_config(&ServiceConfig::default()).unwrap_err();
        assert!(errors.iter().any(|e| e.field == "auth"));
    }

    #[test]
    fn test_unprotected_variant_needs_no_credentials() {
        let mut config = ServiceConfig::default();
        config.auth.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_half_basic_pair_is_rejected() {
        let mut config = keyed();
        config.auth.username = Some("admin".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "auth.password");
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = keyed();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;
        config.dataset.producer.program = " ".into();
        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert!(fields.contains(&"listener.bind_address"));
        assert!(fields.contains(&"timeouts.request_secs"));
        assert!(fields.contains(&"dataset.producer.program"));
    }

    #[test]
    fn test_request_timeout_must_outlive_producer() {
        let mut config = keyed();
        config.timeouts.request_secs = 30;
        config.dataset.producer.timeout_secs = 60;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "timeouts.request_secs");

        config.dataset.producer.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_metrics_path_cannot_shadow_api_routes() {
        for path in ["/health", "/wimbledon", "/wimbledon/", "/wimbledon/player/x"] {
            let mut config = keyed();
            config.observability.metrics_enabled = true;
            config.observability.metrics_path = path.into();
            let errors = validate_config(&config).unwrap_err();
            assert!(
                errors.iter().any(|e| e.field == "observability.metrics_path"),
                "{path} should be rejected"
            );
        }

        let mut config = keyed();
        config.observability.metrics_enabled = true;
        config.observability.metrics_path = "/internal/metrics".into();
        assert!(validate_config(&config).is_ok());
    }
}
