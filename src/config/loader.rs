//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, reason: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, reason } => write!(f, "Invalid {}: {}", var, reason),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values taken from the process environment that override the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// `DATABASE_URL`
    pub database_url: Option<String>,
    /// `PORT`
    pub port: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            database_url: std::env::var("DATABASE_URL").ok(),
            port: std::env::var("PORT").ok(),
        }
    }
}

impl AppConfig {
    /// Apply environment overrides on top of file values.
    pub fn apply_overrides(&mut self, overrides: &EnvOverrides) -> Result<(), ConfigError> {
        if let Some(url) = &overrides.database_url {
            self.database.url = url.clone();
        }
        if let Some(port) = &overrides.port {
            self.server.port = port.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::Env {
                    var: "PORT",
                    reason: e.to_string(),
                }
            })?;
        }
        Ok(())
    }
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Resolve the effective configuration: file (or defaults), then overrides, then validation.
pub fn resolve_config(
    path: Option<&Path>,
    overrides: &EnvOverrides,
) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => AppConfig::default(),
    };
    config.apply_overrides(overrides)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}
