//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → DATABASE_URL / PORT environment overrides
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → handed to lifecycle::start
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, resolve_config, ConfigError, EnvOverrides};
pub use schema::{ApiConfig, AppConfig, DatabaseConfig, ObservabilityConfig, ServerConfig, TimeoutConfig};
