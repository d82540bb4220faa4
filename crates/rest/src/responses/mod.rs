//! Response building.
//!
//! - [`format`] - Content negotiation between HTML and JSON
//! - [`headers`] - Page response headers
//! - [`document`] - HTML document rendering for assembled pages
//! - [`status`] - Static status pages and redirect responses

pub mod document;
pub mod format;
pub mod headers;
pub mod status;

pub use document::render_document;
pub use format::ResponseFormat;
pub use headers::PageHeaders;
pub use status::{disposition_response, redirect_response, status_page};
