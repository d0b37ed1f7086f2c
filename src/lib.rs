//! Articles API
//!
//! A small CRUD service for blog articles, served over HTTP with Axum and
//! stored in MongoDB.
//!
//! # Architecture Overview
//!
//! ```text
//!   Client ──▶ http::server (router, request id, trace, timeout, metrics)
//!                  │
//!                  ▼
//!              http::posts ──▶ store::ArticleStore ──▶ MongoDB
//!                  │                 (MemoryStore in tests)
//!                  ▼
//!              models::Article::to_view ──▶ JSON response
//!
//!   lifecycle::start  : connect store → bind listener → ServerHandle
//!   ServerHandle::stop: close store  → drain listener
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod models;
pub mod observability;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::{start, start_with_store, ServerHandle};
pub use store::{ArticleStore, MemoryStore, MongoStore};
