//! Error types for the HTTP layer.
//!
//! # Error Mapping
//!
//! | Source | HTTP Status |
//! |--------|-------------|
//! | `EngineError::Store` | 503 |
//! | `EngineError::HierarchyCycle` | 500 |
//! | unsupported method | 405 |
//!
//! Every error renders one of the static HTML pages in
//! [`crate::responses::status`]; details only reach the log.

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use lectern_engine::EngineError;
use lectern_persistence::StorageError;
use thiserror::Error;
use tracing::{error, warn};

use crate::responses::status::status_page;

/// The error type for request handlers.
#[derive(Debug, Error)]
pub enum RestError {
    /// The record store could not be reached (HTTP 503).
    #[error("record store unavailable: {source}")]
    StoreUnavailable {
        /// The underlying storage failure.
        #[source]
        source: StorageError,
    },

    /// The content hierarchy is misconfigured (HTTP 500).
    #[error("configuration error: {message}")]
    Configuration {
        /// What is misconfigured.
        message: String,
    },

    /// The request method is not served (HTTP 405).
    #[error("method {method} not allowed")]
    MethodNotAllowed {
        /// The rejected method.
        method: Method,
    },
}

impl RestError {
    /// Returns the HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            RestError::StoreUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            RestError::Configuration { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RestError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl From<StorageError> for RestError {
    fn from(source: StorageError) -> Self {
        RestError::StoreUnavailable { source }
    }
}

impl From<EngineError> for RestError {
    fn from(err: EngineError) -> Self {
        match err {
            EngineError::Store(source) => RestError::StoreUnavailable { source },
            other @ EngineError::HierarchyCycle { .. } => RestError::Configuration {
                message: other.to_string(),
            },
        }
    }
}

impl IntoResponse for RestError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self, "Request rejected");
        }
        status_page(status)
    }
}

/// Result type for request handlers.
pub type RestResult<T> = Result<T, RestError>;

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_persistence::error::BackendError;
    use lectern_persistence::types::RecordId;

    fn offline() -> StorageError {
        StorageError::Backend(BackendError::Unavailable {
            backend_name: "memory".to_string(),
            message: "offline".to_string(),
        })
    }

    #[test]
    fn test_store_error_maps_to_503() {
        let err = RestError::from(EngineError::Store(offline()));
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn test_cycle_maps_to_500() {
        let err = RestError::from(EngineError::HierarchyCycle {
            id: RecordId::new(4),
        });
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_response_uses_static_page() {
        let response = RestError::MethodNotAllowed {
            method: Method::POST,
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.headers()[axum::http::header::CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }
}
