//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, timeout, metrics)
//! - Serve on a bound listener until told to stop

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::Request;
use axum::{middleware, routing::get, Router};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::posts::{self, AppState};
use crate::http::request::{UuidRequestId, X_REQUEST_ID};
use crate::lifecycle::shutdown::ShutdownSignal;
use crate::observability::metrics;
use crate::store::ArticleStore;

/// HTTP server for the articles API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server over `store`.
    pub fn new(config: &AppConfig, store: Arc<dyn ArticleStore>) -> Self {
        let state = AppState {
            store,
            api: config.api.clone(),
        };
        Self {
            router: Self::build_router(config, state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let timeout = Duration::from_secs(config.timeouts.request_secs);

        Router::new()
            .route(
                "/posts",
                get(posts::list_posts)
                    .post(posts::create_post)
                    .fallback(posts::not_found),
            )
            .route(
                "/posts/{id}",
                get(posts::get_post)
                    .put(posts::update_post)
                    .delete(posts::delete_post)
                    .fallback(posts::not_found),
            )
            .route("/health", get(health).fallback(posts::not_found))
            .fallback(posts::not_found)
            .with_state(state)
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(X_REQUEST_ID, UuidRequestId))
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        let request_id = request
                            .headers()
                            .get(&X_REQUEST_ID)
                            .and_then(|v| v.to_str().ok())
                            .unwrap_or("unknown");
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            uri = %request.uri(),
                            request_id = %request_id,
                        )
                    }))
                    .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                    .layer(TimeoutLayer::new(timeout)),
            )
    }

    /// The router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires, then drain in-flight requests.
    pub async fn run(self, listener: TcpListener, shutdown: ShutdownSignal) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!(address = %addr, "HTTP server stopped");
        Ok(())
    }
}

/// Liveness probe.
async fn health() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ArticleList, ArticleView, Author, NewArticle};
    use crate::store::MemoryStore;
    use axum::body::to_bytes;
    use axum::http::{header, Method, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn server(store: &MemoryStore, api: crate::config::ApiConfig) -> Router {
        let config = AppConfig {
            api,
            ..Default::default()
        };
        HttpServer::new(&config, Arc::new(store.clone())).router()
    }

    async fn send(router: &Router, method: Method, uri: &str, body: Option<Value>) -> Response {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        router.clone().oneshot(builder.body(body).unwrap()).await.unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn seed(store: &MemoryStore, title: &str) -> String {
        store
            .create(NewArticle {
                title: title.into(),
                content: "C".into(),
                author: Author::new("Jane", "Doe"),
            })
            .await
            .unwrap()
            .id
            .to_hex()
    }

    #[tokio::test]
    async fn test_create_returns_projection_and_location() {
        let store = MemoryStore::new();
        let router = server(&store, Default::default());

        let response = send(
            &router,
            Method::POST,
            "/posts",
            Some(json!({"title": "T", "content": "C", "author": {"firstName": "Jane", "lastName": "Doe"}})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response.headers()[header::LOCATION].to_str().unwrap().to_string();
        let view: ArticleView = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(view.author, "Jane Doe");

        let id = location.trim_start_matches("/posts/");
        assert!(store.find_by_id(id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_create_without_body_reports_title() {
        let store = MemoryStore::new();
        let router = server(&store, Default::default());

        let response = send(&router, Method::POST, "/posts", None).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_text(response).await, "Missing title in request body");
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_empty_title_is_internal_error() {
        let store = MemoryStore::new();
        let router = server(&store, Default::default());

        let response = send(
            &router,
            Method::POST,
            "/posts",
            Some(json!({"title": "", "content": "C", "author": {"firstName": "Jane", "lastName": "Doe"}})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_create_with_partial_author_is_internal_error() {
        let store = MemoryStore::new();
        let router = server(&store, Default::default());

        for author in [json!({}), json!({"firstName": "Jane"}), json!({"firstName": "", "lastName": "Doe"})] {
            let response = send(
                &router,
                Method::POST,
                "/posts",
                Some(json!({"title": "T", "content": "C", "author": author.clone()})),
            )
            .await;

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{author}");
            assert_eq!(body_text(response).await, r#"{"message":"Internal server error"}"#);
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_500_by_default() {
        let store = MemoryStore::new();
        let router = server(&store, Default::default());
        let id = mongodb::bson::oid::ObjectId::new().to_hex();

        let response = send(&router, Method::GET, &format!("/posts/{id}"), None).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_text(response).await, r#"{"message":"Internal server error"}"#);
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_404_when_enabled() {
        let store = MemoryStore::new();
        let api = crate::config::ApiConfig {
            not_found_as_404: true,
            ..Default::default()
        };
        let router = server(&store, api);
        let id = mongodb::bson::oid::ObjectId::new().to_hex();

        let response = send(&router, Method::GET, &format!("/posts/{id}"), None).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_text(response).await, r#"{"message":"Not Found"}"#);
    }

    #[tokio::test]
    async fn test_malformed_id_is_500() {
        let store = MemoryStore::new();
        let router = server(&store, Default::default());

        let response = send(&router, Method::DELETE, "/posts/not-an-id", None).await;

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_update_with_missing_body_id() {
        let store = MemoryStore::new();
        let id = seed(&store, "Original").await;
        let router = server(&store, Default::default());

        let response = send(
            &router,
            Method::PUT,
            &format!("/posts/{id}"),
            Some(json!({"title": "Changed"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_text(response).await,
            format!("Id in request path: {id} and request body: undefined must match")
        );
        let stored = store.find_by_id(&id).await.unwrap().unwrap();
        assert_eq!(stored.title, "Original");
    }

    #[tokio::test]
    async fn test_update_changes_only_supplied_fields() {
        let store = MemoryStore::new();
        let id = seed(&store, "Original").await;
        let router = server(&store, Default::default());

        let response = send(
            &router,
            Method::PUT,
            &format!("/posts/{id}"),
            Some(json!({"id": id, "content": "New content"})),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        let view: ArticleView = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(view.title, "Original");
        assert_eq!(view.content, "New content");
        assert_eq!(view.author, "Jane Doe");
    }

    #[tokio::test]
    async fn test_list_and_delete() {
        let store = MemoryStore::new();
        let first = seed(&store, "First").await;
        seed(&store, "Second").await;
        let router = server(&store, Default::default());

        let response = send(&router, Method::DELETE, &format!("/posts/{first}"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(body_text(response).await.is_empty());

        let response = send(&router, Method::GET, "/posts", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let list: ArticleList = serde_json::from_str(&body_text(response).await).unwrap();
        let titles: Vec<_> = list.articles.iter().map(|a| a.title.as_str()).collect();
        assert_eq!(titles, ["Second"]);
    }

    #[tokio::test]
    async fn test_unknown_routes_and_methods_are_404() {
        let store = MemoryStore::new();
        let router = server(&store, Default::default());

        for (method, uri) in [
            (Method::GET, "/nope"),
            (Method::PATCH, "/posts"),
            (Method::POST, "/posts/abc"),
            (Method::GET, "/posts/abc/comments"),
            (Method::POST, "/health"),
            (Method::DELETE, "/health"),
        ] {
            let response = send(&router, method.clone(), uri, None).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
            assert_eq!(body_text(response).await, r#"{"message":"Not Found"}"#);
        }
    }

    #[tokio::test]
    async fn test_request_id_is_echoed() {
        let store = MemoryStore::new();
        let router = server(&store, Default::default());

        let request = Request::builder()
            .uri("/health")
            .header("x-request-id", "abc-123")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(request).await.unwrap();
        assert_eq!(response.headers()["x-request-id"], "abc-123");

        let response = send(&router, Method::GET, "/health", None).await;
        assert!(response.headers().contains_key("x-request-id"));
    }
}
