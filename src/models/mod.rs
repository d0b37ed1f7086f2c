//! Record model.
//!
//! # Data Flow
//! ```text
//! request body
//!     → NewArticle / ArticleUpdate (typed input)
//!     → store (persist, assign id)
//!     → Article (stored shape)
//!     → ArticleView (projection sent to clients)
//! ```

pub mod article;

pub use article::{Article, ArticleList, ArticleUpdate, ArticleView, Author, NewArticle, ValidationError};
