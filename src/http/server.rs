//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wrap the data endpoints in the auth gate (route layer, not global)
//! - Wire up middleware (tracing, timeout, request ID, CORS, panics)
//! - Bind server to listener and drain on shutdown

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::header,
    middleware,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::CorsLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServiceConfig;
use crate::dataset::DatasetStore;
use crate::http::error::ApiError;
use crate::http::handlers;
use crate::http::request::{MakeRequestUuidV4, X_REQUEST_ID};
use crate::lifecycle::shutdown;
use crate::observability::metrics::{self, MetricsState};
use crate::security::auth::{require_credentials, AuthState};
use crate::security::headers;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<DatasetStore>,
}

/// HTTP server for the finals API.
pub struct HttpServer {
    config: ServiceConfig,
    state: AppState,
    metrics: Option<MetricsState>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: ServiceConfig) -> Self {
        let store = Arc::new(DatasetStore::from_config(&config.dataset));
        Self {
            config,
            state: AppState { store },
            metrics: None,
        }
    }

    /// Serve Prometheus metrics from the configured path.
    pub fn with_metrics(mut self, metrics: MetricsState) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The dataset store backing the handlers.
    pub fn store(&self) -> &Arc<DatasetStore> {
        &self.state.store
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    pub fn router(&self) -> Router {
        let mut data = Router::new()
            .route("/wimbledon", get(handlers::get_final))
            .route("/wimbledon/player/{name}", get(handlers::get_player_finals));

        if self.config.auth.enabled {
            let auth = AuthState::new(self.config.auth.clone());
            data = data.route_layer(middleware::from_fn_with_state(auth, require_credentials));
        } else {
            tracing::warn!("Auth gate disabled, data endpoints are public");
        }

        let mut router = Router::new()
            .route("/health", get(handlers::health))
            .merge(data)
            .with_state(self.state.clone());

        if let Some(state) = &self.metrics {
            router = router.route(
                &self.config.observability.metrics_path,
                get(metrics::render).with_state(state.clone()),
            );
        }

        let mut router = router
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(CatchPanicLayer::custom(handle_panic))
            .layer(TimeoutLayer::new(Duration::from_secs(
                self.config.timeouts.request_secs,
            )));

        if self.config.security.cors_permissive {
            router = router.layer(CorsLayer::permissive());
        }
        if self.config.security.enable_headers {
            router = router.layer(SetResponseHeaderLayer::if_not_present(
                header::X_CONTENT_TYPE_OPTIONS,
                headers::NOSNIFF,
            ));
        }

        router
            .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
            .layer(TraceLayer::new_for_http())
            .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuidV4))
    }

    /// Run the server, accepting connections on the given listener until a
    /// shutdown signal is broadcast.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            dataset = %self.state.store.path().display(),
            auth_enabled = self.config.auth.enabled,
            "HTTP server starting"
        );

        if self.config.dataset.generate_on_startup {
            if let Err(e) = self.state.store.ensure_exists().await {
                tracing::warn!(error = %e, "Dataset not prepared at startup, will retry per request");
            }
        }

        let app = self.router();

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown::requested(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic".to_string());
    ApiError::Internal(detail).into_response()
}
