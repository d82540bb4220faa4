//! Error types for the content engine.
//!
//! Only failures that abort a request live here. Problems the interpreter
//! can report inline (an unknown function, a failing function, a malformed
//! directive) never surface as errors.

use lectern_persistence::StorageError;
use lectern_persistence::types::RecordId;
use thiserror::Error;

/// Errors that abort handling of a request.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The record store failed.
    #[error(transparent)]
    Store(#[from] StorageError),

    /// A record's parent chain loops back on itself.
    #[error("breadcrumb hierarchy contains a cycle at record {id}")]
    HierarchyCycle {
        /// The first record seen twice.
        id: RecordId,
    },
}

/// Hard failures while interpreting a content blob.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InterpretError {
    /// An embedded table directive had no usable definition.
    #[error("table definition missing{}", .definition.as_deref().map(|d| format!(": {}", d)).unwrap_or_default())]
    TableDefinitionMissing {
        /// The definition name that was looked up, if one could be derived.
        definition: Option<String>,
    },
}

/// Error returned by a directive function.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FunctionError {
    /// The arguments were not what the function expects.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The function ran and failed.
    #[error("{0}")]
    Failed(String),
}

/// Error returned by the table subsystem.
#[derive(Error, Debug)]
pub enum TableError {
    /// No definition exists under the given name.
    #[error("table definition '{0}' not found")]
    DefinitionMissing(String),

    /// The definition exists but cannot be used.
    #[error("table definition '{name}' is malformed: {message}")]
    Malformed {
        /// Definition name.
        name: String,
        /// What is wrong with it.
        message: String,
    },

    /// Reading the definition failed.
    #[error("failed to read table definition '{name}': {source}")]
    Io {
        /// Definition name.
        name: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;
