//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the finals service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Credentials accepted by the auth gate.
    pub auth: AuthConfig,

    /// Backing store location and its producer.
    pub dataset: DatasetConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:5000".to_string(),
        }
    }
}

/// Shared-secret configuration for the protected endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Wrap the data endpoints in the auth gate.
    pub enabled: bool,

    /// Pre-shared key accepted via `X-API-Key` or `?api_key=`.
    pub api_key: Option<String>,

    /// Basic-auth username.
    pub username: Option<String>,

    /// Basic-auth password.
    pub password: Option<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_key: None,
            username: None,
            password: None,
        }
    }
}

/// Dataset location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path of the CSV backing store.
    pub path: PathBuf,

    /// Run the producer once at startup when the store is missing.
    pub generate_on_startup: bool,

    /// External process that writes the backing store.
    pub producer: ProducerConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("wimbledon_finals.csv"),
            generate_on_startup: false,
            producer: ProducerConfig::default(),
        }
    }
}

/// External producer invocation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProducerConfig {
    /// Allow regeneration of a missing store.
    pub enabled: bool,

    /// Program to execute.
    pub program: String,

    /// Arguments passed to the program.
    pub args: Vec<String>,

    /// Working directory; inherits the service's when unset.
    pub working_dir: Option<PathBuf>,

    /// Hard limit on a single run, in seconds.
    pub timeout_secs: u64,
}

impl Default for ProducerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            program: "python3".to_string(),
            args: vec!["extract_data.py".to_string()],
            working_dir: None,
            timeout_secs: 60,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        // Must outlive a cold-start producer run.
        Self { request_secs: 90 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Expose Prometheus metrics.
    pub metrics_enabled: bool,

    /// Route serving the metrics exposition.
    pub metrics_path: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_path: "/metrics".to_string(),
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Enable security headers.
    pub enable_headers: bool,
    /// Allow cross-origin requests from any origin.
    pub cors_permissive: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            enable_headers: true,
            cors_permissive: true,
        }
    }
}
