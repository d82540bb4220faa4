//! Health check endpoint handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use lectern_persistence::core::RecordStore;
use tracing::{debug, warn};

use crate::state::AppState;

/// Handler for the health check endpoint.
///
/// # HTTP Request
///
/// `GET [base]/_health`
pub async fn health_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: RecordStore + 'static,
{
    debug!("Processing health check request");

    let health_response = serde_json::json!({
        "status": "healthy",
        "backend": state.store().backend_name(),
        "timestamp": chrono::Utc::now().to_rfc3339()
    });

    (StatusCode::OK, Json(health_response)).into_response()
}

/// Handler for the liveness probe.
///
/// # HTTP Request
///
/// `GET [base]/_liveness`
pub async fn liveness_handler() -> impl IntoResponse {
    StatusCode::OK
}

/// Handler for the readiness probe.
///
/// Runs a root lookup against the store; a store error reports
/// `503 Service Unavailable`.
///
/// # HTTP Request
///
/// `GET [base]/_readiness`
pub async fn readiness_handler<S>(State(state): State<AppState<S>>) -> Response
where
    S: RecordStore + 'static,
{
    debug!("Processing readiness check request");

    let backend_name = state.store().backend_name();
    match state.store().find_by_key("/", false).await {
        Ok(_) => {
            let response = serde_json::json!({
                "status": "ready",
                "backend": backend_name,
                "checks": { "storage": "ok" }
            });
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            warn!(backend = backend_name, error = %e, "Readiness check failed");
            let response = serde_json::json!({
                "status": "unavailable",
                "backend": backend_name,
                "checks": { "storage": e.to_string() }
            });
            (StatusCode::SERVICE_UNAVAILABLE, Json(response)).into_response()
        }
    }
}
