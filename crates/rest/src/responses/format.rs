//! Content negotiation.

use axum::http::{HeaderMap, header};
use mime::Mime;

/// The representation a page is sent in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// A rendered HTML document.
    #[default]
    Html,
    /// The assembled page serialized as JSON.
    Json,
}

impl ResponseFormat {
    /// Picks the format from the `Accept` header.
    ///
    /// JSON is chosen only when `application/json` is listed ahead of any
    /// HTML type; everything else gets HTML.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let Some(accept) = headers.get(header::ACCEPT).and_then(|v| v.to_str().ok()) else {
            return ResponseFormat::Html;
        };

        for candidate in accept.split(',') {
            let Ok(mime) = candidate.trim().parse::<Mime>() else {
                continue;
            };
            if mime.essence_str() == mime::APPLICATION_JSON.essence_str() {
                return ResponseFormat::Json;
            }
            if mime.type_() == mime::TEXT && mime.subtype() == mime::HTML {
                return ResponseFormat::Html;
            }
        }
        ResponseFormat::Html
    }
}
