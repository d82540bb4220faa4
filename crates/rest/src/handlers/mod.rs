//! HTTP request handlers.
//!
//! - [`page`] - Content pages, redirects and static status responses
//! - [`health`] - Health, liveness and readiness probes

pub mod health;
pub mod page;

pub use health::{health_handler, liveness_handler, readiness_handler};
pub use page::page_handler;
