//! Error responses.
//!
//! # Responsibilities
//! - Map route-layer failures to HTTP status codes and bodies
//!
//! # Design Decisions
//! - Validation failures answer 400 with a plain-text message
//! - Everything else the client cannot fix answers 500 with a generic JSON message
//! - Store details are logged, never sent

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request is missing something or is shaped wrong. Sent verbatim.
    #[error("{0}")]
    Validation(String),

    /// Unknown route, or an unknown id when 404s are enabled.
    #[error("Not Found")]
    NotFound,

    /// An id lookup found nothing. Reported as an internal error unless
    /// `api.not_found_as_404` is set.
    #[error("no article with id {0}")]
    MissingArticle(String),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MissingArticle(_) | ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ApiError::Validation(message) => (status, message).into_response(),
            ApiError::NotFound => (status, Json(json!({ "message": "Not Found" }))).into_response(),
            ApiError::MissingArticle(_) | ApiError::Store(_) => {
                (status, Json(json!({ "message": "Internal server error" }))).into_response()
            }
        }
    }
}
