//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, JSON body fields)
//!     → posts.rs (validate, call the article store, project)
//!     → response.rs (errors → status codes)
//!     → Send to client
//! ```

pub mod posts;
pub mod request;
pub mod response;
pub mod server;

pub use posts::AppState;
pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::ApiError;
pub use server::HttpServer;
