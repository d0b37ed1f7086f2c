//! `/posts` handlers.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::{Map, Value};

use crate::config::ApiConfig;
use crate::http::request::json_fields;
use crate::http::response::ApiError;
use crate::models::{Article, ArticleList, ArticleUpdate, ArticleView, NewArticle};
use crate::observability::metrics;
use crate::store::{ArticleStore, StoreError};

/// Fields `POST /posts` requires, in the order they are checked.
const REQUIRED_FIELDS: [&str; 3] = ["title", "content", "author"];

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn ArticleStore>,
    pub api: ApiConfig,
}

/// Log a store failure and turn it into a 500.
fn store_failure(operation: &'static str, err: impl Into<StoreError>) -> ApiError {
    let err = err.into();
    tracing::error!(operation, error = %err, "Article store operation failed");
    metrics::record_store_error(operation);
    ApiError::Store(err)
}

/// An id lookup came back empty.
fn missing_article(api: &ApiConfig, operation: &'static str, id: &str) -> ApiError {
    if api.not_found_as_404 {
        tracing::debug!(operation, id, "Article not found");
        return ApiError::NotFound;
    }
    tracing::error!(operation, id, "Article not found");
    ApiError::MissingArticle(id.to_string())
}

/// Presence check on the top-level keys of a create body.
fn check_required_fields(fields: &Map<String, Value>, report_all: bool) -> Result<(), ApiError> {
    let mut missing = REQUIRED_FIELDS
        .iter()
        .copied()
        .filter(|field| !fields.contains_key(*field));

    let named = if report_all {
        missing.collect::<Vec<_>>().join(", ")
    } else {
        missing.next().unwrap_or_default().to_string()
    };

    if named.is_empty() {
        return Ok(());
    }
    let message = format!("Missing {named} in request body");
    tracing::warn!(%message, "Rejected create request");
    Err(ApiError::Validation(message))
}

/// Body id as it would print: strings bare, anything else as JSON, absent as `undefined`.
fn display_body_id(id: Option<&Value>) -> String {
    match id {
        None => "undefined".to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// GET /posts
pub async fn list_posts(State(state): State<AppState>) -> Result<Json<ArticleList>, ApiError> {
    let articles = state
        .store
        .find_all()
        .await
        .map_err(|e| store_failure("find_all", e))?;

    Ok(Json(articles.iter().map(Article::to_view).collect()))
}

/// GET /posts/{id}
pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ArticleView>, ApiError> {
    match state.store.find_by_id(&id).await {
        Ok(Some(article)) => Ok(Json(article.to_view())),
        Ok(None) => Err(missing_article(&state.api, "find_by_id", &id)),
        Err(e) => Err(store_failure("find_by_id", e)),
    }
}

/// POST /posts
pub async fn create_post(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let fields = json_fields(&body)?;
    check_required_fields(&fields, state.api.report_all_missing_fields)?;

    let new_article = NewArticle::from_body(fields).map_err(|e| store_failure("create", e))?;
    let article = state
        .store
        .create(new_article)
        .await
        .map_err(|e| store_failure("create", e))?;

    tracing::info!(id = %article.id, "Article created");
    let location = format!("/posts/{}", article.id.to_hex());
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(article.to_view()),
    ))
}

/// PUT /posts/{id}
pub async fn update_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<Json<ArticleView>, ApiError> {
    let fields = json_fields(&body)?;

    let body_id = fields.get("id");
    let ids_match = matches!(body_id, Some(Value::String(body_id)) if *body_id == id);
    if !ids_match {
        let message = format!(
            "Id in request path: {} and request body: {} must match",
            id,
            display_body_id(body_id)
        );
        tracing::warn!(%message, "Rejected update request");
        return Err(ApiError::Validation(message));
    }

    let update = ArticleUpdate::from_body(&fields).map_err(|e| store_failure("update", e))?;
    match state.store.find_by_id_and_update(&id, update).await {
        Ok(Some(article)) => {
            tracing::info!(id = %article.id, "Article updated");
            Ok(Json(article.to_view()))
        }
        Ok(None) => Err(missing_article(&state.api, "update", &id)),
        Err(e) => Err(store_failure("update", e)),
    }
}

/// DELETE /posts/{id}
///
/// 204 whether or not the article existed.
pub async fn delete_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let removed = state
        .store
        .find_by_id_and_remove(&id)
        .await
        .map_err(|e| store_failure("remove", e))?;

    tracing::info!(id = %id, existed = removed.is_some(), "Article deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Catch-all for unknown paths and methods.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other}"),
        }
    }

    fn validation_message(result: Result<(), ApiError>) -> String {
        match result {
            Err(ApiError::Validation(message)) => message,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_first_missing_field_wins() {
        let body = fields(json!({"author": {}}));
        assert_eq!(
            validation_message(check_required_fields(&body, false)),
            "Missing title in request body"
        );

        let body = fields(json!({"title": "T"}));
        assert_eq!(
            validation_message(check_required_fields(&body, false)),
            "Missing content in request body"
        );

        let body = fields(json!({"title": "T", "content": "C"}));
        assert_eq!(
            validation_message(check_required_fields(&body, false)),
            "Missing author in request body"
        );
    }

    #[test]
    fn test_all_missing_fields_when_enabled() {
        let body = fields(json!({"content": "C"}));
        assert_eq!(
            validation_message(check_required_fields(&body, true)),
            "Missing title, author in request body"
        );
    }

    #[test]
    fn test_presence_not_value_is_checked() {
        let body = fields(json!({"title": null, "content": "", "author": 1}));
        assert!(check_required_fields(&body, false).is_ok());
        assert!(check_required_fields(&body, true).is_ok());
    }

    #[test]
    fn test_display_body_id() {
        assert_eq!(display_body_id(None), "undefined");
        assert_eq!(display_body_id(Some(&json!("abc"))), "abc");
        assert_eq!(display_body_id(Some(&json!(12))), "12");
        assert_eq!(display_body_id(Some(&Value::Null)), "null");
    }

    #[test]
    fn test_missing_article_respects_flag() {
        let default = ApiConfig::default();
        assert!(matches!(
            missing_article(&default, "find_by_id", "x"),
            ApiError::MissingArticle(id) if id == "x"
        ));

        let with_404 = ApiConfig {
            not_found_as_404: true,
            ..Default::default()
        };
        assert!(matches!(
            missing_article(&with_404, "find_by_id", "x"),
            ApiError::NotFound
        ));
    }
}
