//! Structured logging.
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins; otherwise the configured level applies to this crate and tower-http

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter used when `RUST_LOG` is unset.
pub fn default_directives(config: &ObservabilityConfig) -> String {
    format!(
        "articles_api={level},tower_http={level}",
        level = config.log_level
    )
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_directives(config).into());

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
