//! # lectern-rest - HTTP surface for the Lectern content server
//!
//! Wraps [`lectern_engine::Engine`] in an axum application. Every path that
//! is not a health endpoint is handed to the engine, and its outcome becomes
//! one response:
//!
//! | Outcome | Response |
//! |---------|----------|
//! | page | `200` HTML document, or JSON with `Accept: application/json` |
//! | redirect | `301`/`302`/`303`/`307` with `Location` |
//! | forbidden, not found, gone, unavailable | static `403`/`404`/`410`/`503` page |
//! | store failure | static `503` page |
//! | hierarchy cycle | static `500` page |
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lectern_persistence::backends::memory::MemoryStore;
//! use lectern_rest::{ServerConfig, create_app_with_config};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::default();
//! let app = create_app_with_config(MemoryStore::new(), config.clone());
//!
//! let listener = tokio::net::TcpListener::bind(config.socket_addr()).await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! - [`config`] - Server configuration
//! - [`state`] - Application state (engine, configuration)
//! - [`error`] - Error types and their status pages
//! - [`handlers`] - Page and health handlers
//! - [`extractors`] - Preview access
//! - [`responses`] - Documents, headers, status pages and redirects
//! - [`routing`] - Route table

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod responses;
pub mod routing;
pub mod state;

pub use config::ServerConfig;
pub use error::{RestError, RestResult};
pub use state::AppState;

use std::sync::Arc;

use axum::Router;
use http::{HeaderValue, Request};
use lectern_persistence::core::RecordStore;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

/// Creates the application with default configuration.
pub fn create_app<S>(store: S) -> Router
where
    S: RecordStore + 'static,
{
    create_app_with_config(store, ServerConfig::default())
}

/// Creates the application with custom configuration.
///
/// # Example
///
/// ```
/// use lectern_persistence::backends::memory::MemoryStore;
/// use lectern_rest::{ServerConfig, create_app_with_config};
///
/// let config = ServerConfig {
///     project_name: "Docs".to_string(),
///     ..ServerConfig::for_testing()
/// };
/// let app = create_app_with_config(MemoryStore::new(), config);
/// ```
pub fn create_app_with_config<S>(store: S, config: ServerConfig) -> Router
where
    S: RecordStore + 'static,
{
    info!(
        "Creating Lectern server with backend: {}",
        store.backend_name()
    );

    let state = AppState::new(Arc::new(store), config.clone());
    let router = routing::routes::create_routes(state);

    let service_builder = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            axum::http::StatusCode::REQUEST_TIMEOUT,
            std::time::Duration::from_secs(config.request_timeout),
        ));

    let router = if config.enable_cors {
        router.layer(build_cors_layer(&config))
    } else {
        router
    };

    let router = router.layer(service_builder);

    if config.enable_request_id {
        router
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    } else {
        router
    }
}

/// Generates `X-Request-Id` values for requests that arrive without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&uuid::Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Builds the CORS layer based on configuration.
fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let mut cors = CorsLayer::new();

    if config.cors_origins == "*" {
        cors = cors.allow_origin(Any);
    } else {
        let origins: Vec<_> = config
            .cors_origins
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_origin(origins);
    }

    if config.cors_methods == "*" {
        cors = cors.allow_methods(Any);
    } else {
        let methods: Vec<_> = config
            .cors_methods
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_methods(methods);
    }

    if config.cors_headers == "*" {
        cors = cors.allow_headers(Any);
    } else {
        let headers: Vec<_> = config
            .cors_headers
            .split(',')
            .filter_map(|s| s.trim().parse().ok())
            .collect();
        cors = cors.allow_headers(headers);
    }

    cors
}

/// Initializes the tracing subscriber.
///
/// Call once at startup. `RUST_LOG` overrides `level` when set.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "lectern={level},lectern_rest={level},lectern_engine={level},lectern_persistence={level},tower_http=debug"
        ))
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
