//! Static status pages and redirect responses.
//!
//! Non-page outcomes never depend on content: 403, 404, 410 and 503 (and
//! the error statuses) come from the fixed bodies below.

use axum::{
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use lectern_engine::redirect::RedirectEmission;
use lectern_persistence::types::RedirectDisposition;
use tracing::warn;

fn body_for(status: StatusCode) -> &'static str {
    match status {
        StatusCode::FORBIDDEN => concat!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>403 Forbidden</title></head>\n",
            "<body><h1>Forbidden</h1><p>You do not have access to this page.</p></body></html>\n"
        ),
        StatusCode::NOT_FOUND => concat!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>404 Not Found</title></head>\n",
            "<body><h1>Not Found</h1><p>The requested page does not exist.</p></body></html>\n"
        ),
        StatusCode::METHOD_NOT_ALLOWED => concat!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>405 Method Not Allowed</title></head>\n",
            "<body><h1>Method Not Allowed</h1><p>Only GET requests are served.</p></body></html>\n"
        ),
        StatusCode::GONE => concat!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>410 Gone</title></head>\n",
            "<body><h1>Gone</h1><p>This page has been removed.</p></body></html>\n"
        ),
        StatusCode::SERVICE_UNAVAILABLE => concat!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>503 Service Unavailable</title></head>\n",
            "<body><h1>Service Unavailable</h1><p>Please try again later.</p></body></html>\n"
        ),
        _ => concat!(
            "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>500 Internal Server Error</title></head>\n",
            "<body><h1>Internal Server Error</h1><p>The page could not be rendered.</p></body></html>\n"
        ),
    }
}

/// Returns the static HTML page for `status`.
pub fn status_page(status: StatusCode) -> Response {
    (
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        )],
        body_for(status),
    )
        .into_response()
}

/// Returns the static response for a non-redirect disposition.
pub fn disposition_response(disposition: RedirectDisposition) -> Response {
    let status =
        StatusCode::from_u16(disposition.code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    status_page(status)
}

/// Writes a redirect.
///
/// A location that is not a valid header value is logged and answered with
/// a 500 page instead.
pub fn redirect_response(emission: &RedirectEmission) -> Response {
    let status = StatusCode::from_u16(emission.status).unwrap_or(StatusCode::FOUND);
    match HeaderValue::from_str(&emission.location) {
        Ok(location) => (status, [(header::LOCATION, location)]).into_response(),
        Err(_) => {
            warn!(location = %emission.location, "Redirect location is not a valid header");
            status_page(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}
