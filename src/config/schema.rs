//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the articles API.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP listener settings.
    pub server: ServerConfig,

    /// Document store connection.
    pub database: DatabaseConfig,

    /// Behaviour switches for the route layer.
    pub api: ApiConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "0.0.0.0").
    pub host: String,

    /// TCP port. 0 lets the OS choose.
    pub port: u16,
}

impl ServerConfig {
    /// `host:port` as passed to the TCP listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// MongoDB connection settings.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Connection string (`mongodb://` or `mongodb+srv://`).
    pub url: String,

    /// Database name.
    pub name: String,

    /// Collection holding the articles.
    pub collection: String,

    /// How long the driver waits for a reachable server before failing an operation.
    pub server_selection_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            name: "blog".to_string(),
            collection: "articles".to_string(),
            server_selection_timeout_secs: 10,
        }
    }
}

/// Route layer switches. Both off by default.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Answer 404 instead of 500 when an id lookup finds nothing.
    pub not_found_as_404: bool,

    /// Name every missing field on create instead of only the first.
    pub report_all_missing_fields: bool,
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Upper bound on the handling of one request, in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the Prometheus endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
