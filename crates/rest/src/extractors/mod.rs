//! Axum extractors.

pub mod preview;

pub use preview::{PREVIEW_QUERY_PARAM, PreviewAccess, X_PREVIEW_TOKEN};
