//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Connect store → ping → bind listener → spawn serve task → ServerHandle
//!
//! Shutdown (shutdown.rs):
//!     ServerHandle::stop → close store → stop accepting → drain connections
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → main calls ServerHandle::stop
//! ```
//!
//! # Design Decisions
//! - No global server state: `start` returns the handle `stop` consumes
//! - Ordered startup: store first, then listener
//! - Ordered shutdown: store first, then listener

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::{ServerHandle, Shutdown, ShutdownSignal, StopError};
pub use signals::shutdown_signal;
pub use startup::{start, start_with_store, StartError};
