//! Error types for the persistence layer.
//!
//! Store failures are always reported as [`StorageError`]; a lookup that
//! simply finds nothing is `Ok(None)`, never an error.

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

/// The primary error type for all store operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Backend-specific errors
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A stored row could not be turned into a domain value.
    #[error("malformed {entity} '{key}': {message}")]
    Malformed {
        entity: &'static str,
        key: String,
        message: String,
    },

    /// A write would violate a unique key.
    #[error("duplicate {entity} key: {key}")]
    DuplicateKey { entity: &'static str, key: String },
}

/// Errors originating in a specific backend.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend is currently unavailable.
    #[error("backend unavailable: {backend_name}: {message}")]
    Unavailable {
        backend_name: String,
        message: String,
    },

    /// Connection to the backend failed.
    #[error("connection failed to {backend_name}: {message}")]
    ConnectionFailed {
        backend_name: String,
        message: String,
    },

    /// Schema migration error.
    #[error("schema migration failed: {message}")]
    MigrationError { message: String },

    /// Query execution error.
    #[error("query execution failed: {message}")]
    QueryError { message: String },

    /// Internal backend error.
    #[error("internal error in {backend_name}: {message}")]
    Internal {
        backend_name: String,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StorageError {
    /// Builds a [`StorageError::Malformed`] for a content record.
    pub fn malformed_record(key: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Malformed {
            entity: "record",
            key: key.into(),
            message: message.into(),
        }
    }

    /// Builds a [`StorageError::Malformed`] for a redirect rule.
    pub fn malformed_redirect(key: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Malformed {
            entity: "redirect",
            key: key.into(),
            message: message.into(),
        }
    }
}

/// Result type alias for store operations.
pub type StorageResult<T> = Result<T, StorageError>;
