//! Page response headers.

use axum::http::{HeaderMap, HeaderValue, header};
use chrono::{DateTime, Utc};
use lectern_engine::page::Page;

/// Formats a timestamp as an HTTP date.
pub fn http_date(timestamp: &DateTime<Utc>) -> String {
    timestamp.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Builder for page response headers.
#[derive(Debug, Default)]
pub struct PageHeaders {
    content_type: String,
    last_modified: Option<String>,
    content_language: Option<String>,
}

impl PageHeaders {
    /// Creates headers for an HTML response.
    pub fn new() -> Self {
        Self {
            content_type: mime::TEXT_HTML_UTF_8.to_string(),
            ..Default::default()
        }
    }

    /// Creates headers describing `page`.
    pub fn from_page(page: &Page) -> Self {
        let headers = Self::new().with_last_modified(http_date(&page.last_modified));
        match &page.language {
            Some(language) => headers.with_content_language(language.clone()),
            None => headers,
        }
    }

    /// Sets the Content-Type.
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Sets the Last-Modified value.
    pub fn with_last_modified(mut self, value: impl Into<String>) -> Self {
        self.last_modified = Some(value.into());
        self
    }

    /// Sets the Content-Language value.
    pub fn with_content_language(mut self, language: impl Into<String>) -> Self {
        self.content_language = Some(language.into());
        self
    }

    /// Returns the Last-Modified value.
    pub fn last_modified(&self) -> Option<&str> {
        self.last_modified.as_deref()
    }

    /// Converts to an Axum HeaderMap.
    pub fn to_header_map(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        if let Ok(value) = HeaderValue::from_str(&self.content_type) {
            headers.insert(header::CONTENT_TYPE, value);
        }

        if let Some(value) = self
            .last_modified
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(header::LAST_MODIFIED, value);
        }

        if let Some(value) = self
            .content_language
            .as_deref()
            .and_then(|v| HeaderValue::from_str(v).ok())
        {
            headers.insert(header::CONTENT_LANGUAGE, value);
        }

        headers
    }
}
