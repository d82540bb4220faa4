//! Redirect table types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What a matched redirect rule (or a resolution failure) does to the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum RedirectDisposition {
    /// 301 Moved Permanently.
    #[default]
    Permanent,
    /// 302 Found.
    Temporary,
    /// 303 See Other.
    SeeOther,
    /// 307 Temporary Redirect (method preserved).
    TemporaryPreserve,
    /// 403 Forbidden.
    Forbidden,
    /// 404 Not Found.
    NotFound,
    /// 410 Gone.
    Gone,
    /// 503 Service Unavailable.
    Unavailable,
}

impl RedirectDisposition {
    /// Returns the HTTP status code for this disposition.
    pub fn code(&self) -> u16 {
        match self {
            RedirectDisposition::Permanent => 301,
            RedirectDisposition::Temporary => 302,
            RedirectDisposition::SeeOther => 303,
            RedirectDisposition::TemporaryPreserve => 307,
            RedirectDisposition::Forbidden => 403,
            RedirectDisposition::NotFound => 404,
            RedirectDisposition::Gone => 410,
            RedirectDisposition::Unavailable => 503,
        }
    }

    /// Parses an HTTP status code into a disposition.
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            301 => Some(RedirectDisposition::Permanent),
            302 => Some(RedirectDisposition::Temporary),
            303 => Some(RedirectDisposition::SeeOther),
            307 => Some(RedirectDisposition::TemporaryPreserve),
            403 => Some(RedirectDisposition::Forbidden),
            404 => Some(RedirectDisposition::NotFound),
            410 => Some(RedirectDisposition::Gone),
            503 => Some(RedirectDisposition::Unavailable),
            _ => None,
        }
    }

    /// Returns true if this disposition emits a `Location` header.
    pub fn is_redirect(&self) -> bool {
        matches!(
            self,
            RedirectDisposition::Permanent
                | RedirectDisposition::Temporary
                | RedirectDisposition::SeeOther
                | RedirectDisposition::TemporaryPreserve
        )
    }
}

impl fmt::Display for RedirectDisposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl TryFrom<u16> for RedirectDisposition {
    type Error = String;

    fn try_from(code: u16) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or_else(|| format!("unsupported redirect code {}", code))
    }
}

impl From<RedirectDisposition> for u16 {
    fn from(disposition: RedirectDisposition) -> Self {
        disposition.code()
    }
}

/// A row of the redirect table.
///
/// `source` is either an exact path (`/old/page.html`) or a wildcard pattern
/// (`/old/*`). A `target` ending in `*` receives the captured path remainder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectRule {
    source: String,
    target: String,
    #[serde(default, rename = "code")]
    disposition: RedirectDisposition,
}

impl RedirectRule {
    /// Creates a redirect rule.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        disposition: RedirectDisposition,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            disposition,
        }
    }

    /// Returns the source pattern.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the raw target.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Returns the disposition.
    pub fn disposition(&self) -> RedirectDisposition {
        self.disposition
    }

    /// Returns true if the source pattern is wildcard-terminated.
    pub fn is_wildcard(&self) -> bool {
        self.source.ends_with(super::WILDCARD)
    }
}
