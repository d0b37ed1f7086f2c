//! Request identification and body parsing.
//!
//! # Responsibilities
//! - Generate a unique request ID (UUID v4) when the client sent none
//! - Read JSON request bodies into a field map for presence checks
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - Bodies are read as raw bytes so a missing or foreign content type
//!   still reaches the handler's own field checks

use axum::http::{HeaderName, HeaderValue, Request};
use serde_json::{Map, Value};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

use crate::http::response::ApiError;

/// Header carrying the request ID in both directions.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Request ID generator for `SetRequestIdLayer`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Parse a JSON object body. An empty body reads as `{}`.
pub fn json_fields(body: &[u8]) -> Result<Map<String, Value>, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Map::new());
    }
    match serde_json::from_slice(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) | Err(_) => Err(ApiError::Validation(
            "Malformed JSON in request body".to_string(),
        )),
    }
}
