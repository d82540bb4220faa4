//! Preview access extractor.
//!
//! Unpublished records are only served to requests that present the
//! configured preview token, either in the `X-Preview-Token` header or in
//! a `preview` query parameter. With no token configured the gate stays
//! closed.

use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, HeaderName, request::Parts},
};
use lectern_persistence::core::RecordStore;
use tracing::debug;

use crate::state::AppState;

/// Header carrying the preview token.
pub const X_PREVIEW_TOKEN: HeaderName = HeaderName::from_static("x-preview-token");

/// Query parameter carrying the preview token.
pub const PREVIEW_QUERY_PARAM: &str = "preview";

/// Whether the request may see unpublished records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreviewAccess {
    granted: bool,
}

impl PreviewAccess {
    /// Access to published records only.
    pub fn denied() -> Self {
        Self { granted: false }
    }

    /// Access to unpublished records as well.
    pub fn granted() -> Self {
        Self { granted: true }
    }

    /// Returns true if unpublished records may be served.
    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Checks the presented token against `expected`.
    ///
    /// The header takes precedence over the query parameter.
    pub fn check(headers: &HeaderMap, query: Option<&str>, expected: Option<&str>) -> Self {
        let Some(expected) = expected else {
            return Self::denied();
        };

        let presented = token_from_headers(headers).or_else(|| query.and_then(token_from_query));
        match presented {
            Some(token) if token == expected => Self::granted(),
            Some(_) => {
                debug!("Preview token rejected");
                Self::denied()
            }
            None => Self::denied(),
        }
    }
}

fn token_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get(&X_PREVIEW_TOKEN)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

fn token_from_query(query: &str) -> Option<String> {
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == PREVIEW_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}

impl<S> FromRequestParts<AppState<S>> for PreviewAccess
where
    S: RecordStore + 'static,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState<S>,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::check(
            &parts.headers,
            parts.uri.query(),
            state.preview_token(),
        ))
    }
}
