//! Redirect table lookup and redirect emission.
//!
//! Consulted only after the URL resolver misses. Exact rules are probed
//! first over every suffix form of the request; wildcard rules are then
//! probed by truncating one segment at a time.

use lectern_persistence::StorageResult;
use lectern_persistence::core::RecordStore;
use lectern_persistence::types::{RedirectDisposition, RedirectRule, SEPARATOR, WILDCARD};
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::path::RequestPath;
use crate::resolver::CapturedParameters;

/// Result of a redirect table lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum RedirectDecision {
    /// A rule matched.
    Rule {
        /// The matching rule.
        rule: RedirectRule,
        /// Segments consumed by a wildcard source, empty for exact rules.
        parameters: CapturedParameters,
    },
    /// No rule matched; respond with the fallback disposition.
    NotFound(RedirectDisposition),
}

impl RedirectDecision {
    /// Returns the disposition to respond with.
    pub fn disposition(&self) -> RedirectDisposition {
        match self {
            RedirectDecision::Rule { rule, .. } => rule.disposition(),
            RedirectDecision::NotFound(fallback) => *fallback,
        }
    }

    /// Returns the rule target with a trailing wildcard replaced by the
    /// captured parameters.
    pub fn target(&self) -> Option<String> {
        match self {
            RedirectDecision::Rule { rule, parameters } => {
                let target = rule.target();
                match target.strip_suffix(WILDCARD) {
                    Some(prefix) if rule.is_wildcard() => {
                        Some(format!("{}{}", prefix, parameters.joined()))
                    }
                    _ => Some(target.to_string()),
                }
            }
            RedirectDecision::NotFound(_) => None,
        }
    }
}

/// Exact redirect sources tried for a request, in priority order.
pub fn exact_candidates(path: &RequestPath, extension: &str) -> Vec<String> {
    if path.is_root() {
        return vec![path.key()];
    }

    let base = path.key();
    let mut candidates = vec![
        format!("{}{}", base, SEPARATOR),
        format!("{}.{}", base, extension),
        base.clone(),
    ];
    if let Some(language) = path.language() {
        candidates.push(format!("{}.{}.{}", base, extension, language));
    }
    candidates
}

/// Looks up the redirect rule for a request that matched no record.
///
/// `max_probes` caps the number of wildcard probes regardless of how many
/// segments the path has.
pub async fn resolve_redirect<S>(
    store: &S,
    path: &RequestPath,
    extension: &str,
    fallback: RedirectDisposition,
    max_probes: usize,
) -> StorageResult<RedirectDecision>
where
    S: RecordStore + ?Sized,
{
    let candidates = exact_candidates(path, extension);
    if let Some(rule) = store.find_redirect(&candidates).await? {
        debug!(source = %rule.source(), "Exact redirect rule matched");
        return Ok(RedirectDecision::Rule {
            rule,
            parameters: CapturedParameters::new(),
        });
    }

    let segments = path.segments();
    let limit = segments.len().min(max_probes);

    for dropped in 1..=limit {
        let kept = &segments[..segments.len() - dropped];
        let key = if kept.is_empty() {
            format!("{}{}", SEPARATOR, WILDCARD)
        } else {
            format!("{}{}{}{}", SEPARATOR, kept.join("/"), SEPARATOR, WILDCARD)
        };

        if let Some(rule) = store.find_wildcard_redirect(&key).await? {
            let parameters: CapturedParameters =
                segments[segments.len() - dropped..].iter().cloned().collect();
            debug!(source = %key, parameters = %parameters, "Wildcard redirect rule matched");
            return Ok(RedirectDecision::Rule { rule, parameters });
        }
    }

    debug!(path = %path, fallback = %fallback, "No redirect rule matched");
    Ok(RedirectDecision::NotFound(fallback))
}

/// A redirect ready to be written to the response.
///
/// Every redirect the engine issues, whether from the redirect table, the
/// canonical enforcer, or a content directive, is expressed as one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedirectEmission {
    /// HTTP status code.
    pub status: u16,
    /// Value of the `Location` header.
    pub location: String,
}

impl RedirectEmission {
    /// Builds an emission for `target`.
    ///
    /// Targets with a scheme are used verbatim; anything else is resolved
    /// against `origin` (for example `https://example.org`).
    pub fn new(disposition: RedirectDisposition, target: &str, origin: &str) -> Self {
        Self {
            status: disposition.code(),
            location: absolute_location(target, origin),
        }
    }
}

fn absolute_location(target: &str, origin: &str) -> String {
    if Url::parse(target).is_ok() {
        return target.to_string();
    }

    let origin = origin.trim_end_matches(SEPARATOR);
    if target.starts_with(SEPARATOR) {
        format!("{}{}", origin, target)
    } else {
        format!("{}{}{}", origin, SEPARATOR, target)
    }
}
