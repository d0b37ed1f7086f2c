//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! handlers, store, lifecycle
//!     → logging.rs (structured tracing events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request span (see http::request)
//! - Metrics are cheap (atomic increments) and off unless enabled

pub mod logging;
pub mod metrics;
