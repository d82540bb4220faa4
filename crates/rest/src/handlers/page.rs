//! Page handler.
//!
//! Serves every path that is not a health endpoint.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use lectern_engine::{Outcome, PageRequest};
use lectern_persistence::core::RecordStore;
use tracing::debug;

use crate::error::{RestError, RestResult};
use crate::extractors::PreviewAccess;
use crate::responses::{
    PageHeaders, ResponseFormat, disposition_response, redirect_response, render_document,
};
use crate::state::AppState;

/// Handler for content pages.
///
/// # HTTP Request
///
/// `GET [base]/{path}`
///
/// # Response
///
/// - `200 OK` - The rendered page, as HTML or (with `Accept: application/json`) JSON
/// - `301/302/303/307` - Redirect with `Location`
/// - `403/404/410/503` - Static status page
/// - `405 Method Not Allowed` - Anything but GET or HEAD
pub async fn page_handler<S>(
    State(state): State<AppState<S>>,
    preview: PreviewAccess,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> RestResult<Response>
where
    S: RecordStore + 'static,
{
    if method != Method::GET && method != Method::HEAD {
        return Err(RestError::MethodNotAllowed { method });
    }

    let mut request = PageRequest::new(uri.path())
        .with_origin(state.origin())
        .with_unpublished(preview.is_granted());
    if let Some(query) = uri.query() {
        request = request.with_query(query);
    }

    debug!(
        path = %request.path,
        preview = request.include_unpublished,
        "Processing page request"
    );

    match state.engine().handle(&request).await? {
        Outcome::Page(page) => {
            let headers_out = PageHeaders::from_page(&page);
            match ResponseFormat::from_headers(&headers) {
                ResponseFormat::Json => {
                    let map = headers_out
                        .with_content_type(mime::APPLICATION_JSON.to_string())
                        .to_header_map();
                    Ok((StatusCode::OK, map, Json(page)).into_response())
                }
                ResponseFormat::Html => {
                    let body = render_document(&page, state.engine().settings());
                    Ok((StatusCode::OK, headers_out.to_header_map(), body).into_response())
                }
            }
        }
        Outcome::Redirect(emission) => {
            debug!(status = emission.status, location = %emission.location, "Redirecting");
            Ok(redirect_response(&emission))
        }
        Outcome::Status(disposition) => {
            debug!(status = disposition.code(), "Static status response");
            Ok(disposition_response(disposition))
        }
    }
}
