//! Article persistence.
//!
//! # Data Flow
//! ```text
//! http handlers
//!     → ArticleStore (trait object shared via Arc)
//!         → MongoStore  (MongoDB collection, production)
//!         → MemoryStore (DashMap, tests and local runs)
//! ```
//!
//! # Design Decisions
//! - Identifiers are ObjectIds rendered as 24 hex characters
//! - An id that does not parse is an error, not a miss
//! - Lookups that find nothing return `Ok(None)`; callers decide what that means
//! - No retries; every failure is reported to the caller once

pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use thiserror::Error;

use crate::models::{Article, ArticleUpdate, NewArticle, ValidationError};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Errors raised by an [`ArticleStore`].
#[derive(Debug, Error)]
pub enum StoreError {
    /// The id is not a valid ObjectId.
    #[error("invalid article id: {0}")]
    InvalidId(String),

    /// The document failed schema validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The MongoDB driver reported an error.
    #[error("database error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// An update could not be encoded as BSON.
    #[error("encoding error: {0}")]
    Encode(#[from] mongodb::bson::ser::Error),

    /// The store has been closed.
    #[error("store is closed")]
    Closed,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations the route layer needs.
#[async_trait]
pub trait ArticleStore: Send + Sync {
    /// Every article, in the store's natural order.
    async fn find_all(&self) -> StoreResult<Vec<Article>>;

    async fn find_by_id(&self, id: &str) -> StoreResult<Option<Article>>;

    /// Validate, assign an id and persist.
    async fn create(&self, article: NewArticle) -> StoreResult<Article>;

    /// Apply a partial update and return the record as it is after the update.
    async fn find_by_id_and_update(
        &self,
        id: &str,
        update: ArticleUpdate,
    ) -> StoreResult<Option<Article>>;

    /// Remove an article, returning it if it existed.
    async fn find_by_id_and_remove(&self, id: &str) -> StoreResult<Option<Article>>;

    /// Round-trip to the backend to prove the connection is usable.
    async fn ping(&self) -> StoreResult<()>;

    async fn close(&self) -> StoreResult<()>;
}

/// Parse a path id into an ObjectId.
pub fn parse_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))
}
