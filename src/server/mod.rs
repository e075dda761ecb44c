//! HTTP API for fireworks.
//!
//! Thin plumbing over [`FireworkService`]: request parsing, CORS,
//! request tracing, panic recovery and the upload size limit live here;
//! all bitmap and storage semantics live in the service.

mod error;
mod routes;

pub use error::ApiError;
pub use routes::UpdateRequest;

use crate::config::{ConfigError, MetricsConfig, ServerConfig};
use crate::metrics::{MetricsError, MetricsRegistry};
use crate::service::FireworkService;
use crate::store::FireworkStore;
use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::get,
    Router,
};
use std::sync::Arc;
use thiserror::Error;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

/// Errors that can occur during server operations.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("failed to bind to address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to initialise metrics: {0}")]
    Metrics(#[from] MetricsError),

    #[error("server error: {0}")]
    Server(String),
}

/// Shared state handed to every handler.
pub struct AppState<S> {
    service: FireworkService<S>,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            metrics: self.metrics.clone(),
        }
    }
}

impl<S: FireworkStore> AppState<S> {
    /// Creates handler state, registering metrics if enabled.
    pub fn new(service: FireworkService<S>, metrics: &MetricsConfig) -> Result<Self, ServerError> {
        let metrics = if metrics.enabled {
            Some(Arc::new(MetricsRegistry::new()?))
        } else {
            None
        };
        let state = Self { service, metrics };
        state.refresh_stored();
        Ok(state)
    }

    fn refresh_stored(&self) {
        let Some(metrics) = &self.metrics else {
            return;
        };
        match self.service.store().count() {
            Ok(count) => metrics.set_stored(count),
            Err(e) => tracing::warn!(error = %e, "Failed to count stored fireworks"),
        }
    }
}

/// HTTP server for the firework API.
pub struct FireworkServer<S> {
    config: ServerConfig,
    state: AppState<S>,
}

impl<S: FireworkStore + 'static> FireworkServer<S> {
    /// Creates a new server.
    pub fn new(config: ServerConfig, state: AppState<S>) -> Self {
        Self { config, state }
    }

    /// Builds the router with all routes and middleware.
    pub fn router(&self) -> Result<Router, ServerError> {
        build_router(&self.config, self.state.clone())
    }

    /// Starts the HTTP server.
    ///
    /// Runs until Ctrl-C is received, then drains in-flight requests.
    pub async fn run(self) -> Result<(), ServerError> {
        let app = self.router()?;
        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        tracing::info!(addr = %self.config.bind_addr, "Firework server listening");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| ServerError::Server(e.to_string()))?;

        tracing::info!("Firework server stopped");
        Ok(())
    }
}

fn build_router<S: FireworkStore + 'static>(
    config: &ServerConfig,
    state: AppState<S>,
) -> Result<Router, ServerError> {
    config.validate()?;

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(config.origin_headers()?))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
        ])
        .allow_credentials(true);

    let router = Router::new()
        .route(
            "/fireworks",
            get(routes::list_fireworks::<S>).post(routes::create_firework::<S>),
        )
        .route(
            "/fireworks/:id",
            get(routes::get_firework::<S>)
                .put(routes::update_firework::<S>)
                .delete(routes::delete_firework::<S>),
        )
        .route("/metrics", get(routes::metrics_handler::<S>))
        .route("/health", get(routes::health_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new());

    Ok(router)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
