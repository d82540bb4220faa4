//! Route table.

use axum::{Router, routing::get};
use lectern_persistence::core::RecordStore;

use crate::handlers;
use crate::state::AppState;

/// Creates all routes.
///
/// # Routes
///
/// - `GET /_health` - Health check
/// - `GET /_liveness` - Liveness probe
/// - `GET /_readiness` - Readiness probe
/// - anything else - Content pages
pub fn create_routes<S>(state: AppState<S>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route("/_health", get(handlers::health_handler::<S>))
        .route("/_liveness", get(handlers::liveness_handler))
        .route("/_readiness", get(handlers::readiness_handler::<S>))
        .fallback(handlers::page_handler::<S>)
        .with_state(state)
}
