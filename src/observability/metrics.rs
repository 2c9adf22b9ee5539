//! Metrics collection and exposition.
//!
//! # Metrics
//! - `wimbledon_http_requests_total` (counter): requests by method, route, status
//! - `wimbledon_http_request_duration_seconds` (histogram): latency by method, route
//! - `wimbledon_producer_runs_total` (counter): producer runs by outcome
//! - `wimbledon_auth_rejections_total` (counter): rejected credentials by reason
//! - `wimbledon_rows_skipped_total` (counter): malformed dataset rows
//!
//! # Design Decisions
//! - Route label uses the matched route template, not the raw path, so player
//!   names do not explode cardinality
//! - Recording is a no-op until `init_metrics` installs the recorder

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{MatchedPath, State},
    http::{header::CONTENT_TYPE, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Shared state containing the Prometheus handle for metrics rendering.
#[derive(Clone)]
pub struct MetricsState {
    handle: Arc<PrometheusHandle>,
}

impl MetricsState {
    pub fn new(handle: PrometheusHandle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    /// Renders the current metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to install Prometheus recorder: {0}")]
    Install(String),
}

/// Install the global Prometheus recorder. Call once at startup.
pub fn init_metrics() -> Result<MetricsState, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::Install(e.to_string()))?;

    describe_metrics();
    Ok(MetricsState::new(handle))
}

fn describe_metrics() {
    metrics::describe_counter!("wimbledon_http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "wimbledon_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    metrics::describe_counter!(
        "wimbledon_producer_runs_total",
        "Dataset producer invocations by outcome"
    );
    metrics::describe_counter!(
        "wimbledon_auth_rejections_total",
        "Requests rejected by the auth gate"
    );
    metrics::describe_counter!(
        "wimbledon_rows_skipped_total",
        "Malformed dataset rows skipped while loading"
    );
}

/// Prometheus scrape handler.
pub async fn render(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.render(),
    )
}

/// Middleware recording request count and latency.
pub async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "wimbledon_http_requests_total",
        "method" => method.clone(),
        "route" => route.clone(),
        "status" => status
    )
    .increment(1);
    metrics::histogram!(
        "wimbledon_http_request_duration_seconds",
        "method" => method,
        "route" => route
    )
    .record(start.elapsed().as_secs_f64());

    response
}
