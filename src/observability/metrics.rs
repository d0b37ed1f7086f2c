//! Metrics collection and exposition.
//!
//! # Metrics
//! - `articles_requests_total` (counter): requests by method, route, status
//! - `articles_request_duration_seconds` (histogram): latency by method, route
//! - `articles_store_errors_total` (counter): store failures by operation
//!
//! Without an installed recorder the macros are no-ops, so tests and
//! `metrics_enabled = false` runs pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus exporter on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, route: &str, status: u16, start: Instant) {
    metrics::counter!(
        "articles_requests_total",
        "method" => method.to_string(),
        "route" => route.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!(
        "articles_request_duration_seconds",
        "method" => method.to_string(),
        "route" => route.to_string()
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_store_error(operation: &'static str) {
    metrics::counter!("articles_store_errors_total", "operation" => operation).increment(1);
}

/// Middleware recording one sample per request, labelled by route template.
pub async fn track_requests(request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(request).await;
    record_request(&method, &route, response.status().as_u16(), start);
    response
}
