//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check the database URL parses as a MongoDB connection string
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use mongodb::options::ConnectionString;
use thiserror::Error;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("server.host must not be empty")]
    EmptyHost,

    #[error("database.url `{url}` is invalid: {reason}")]
    InvalidDatabaseUrl { url: String, reason: String },

    #[error("database.{0} must not be empty")]
    EmptyDatabaseField(&'static str),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("observability.metrics_address `{0}` is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check `config` and report every problem found.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.host.trim().is_empty() {
        errors.push(ValidationError::EmptyHost);
    }

    if let Err(reason) = check_database_url(&config.database.url) {
        errors.push(ValidationError::InvalidDatabaseUrl {
            url: config.database.url.clone(),
            reason,
        });
    }
    if config.database.name.is_empty() {
        errors.push(ValidationError::EmptyDatabaseField("name"));
    }
    if config.database.collection.is_empty() {
        errors.push(ValidationError::EmptyDatabaseField("collection"));
    }
    if config.database.server_selection_timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("database.server_selection_timeout_secs"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout("timeouts.request_secs"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse with the driver's own connection string grammar. SRV records are not resolved here.
fn check_database_url(raw: &str) -> Result<(), String> {
    ConnectionString::parse(raw)
        .map(|_| ())
        .map_err(|e| e.to_string())
}
