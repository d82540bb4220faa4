//! Progressive wildcard URL resolution.
//!
//! A request for `/a/b/c` is looked up as `/a/b/c`, then `/a/b/*`, `/a/*`
//! and finally `/*`. Each truncation moves the dropped segment to the front
//! of the captured parameters, so a hit on `/a/*` captures `b/c`.

use std::collections::VecDeque;
use std::fmt;

use lectern_persistence::StorageResult;
use lectern_persistence::core::RecordStore;
use lectern_persistence::types::{ContentRecord, SEPARATOR, WILDCARD};
use serde::Serialize;
use tracing::debug;

use crate::path::RequestPath;

/// Path segments stripped off during wildcard matching, in request order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CapturedParameters(Vec<String>);

impl CapturedParameters {
    /// Creates an empty parameter list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the captured segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Returns true if nothing was captured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of captured segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the segments joined with the path separator.
    pub fn joined(&self) -> String {
        self.0.join("/")
    }
}

impl<S: Into<String>> FromIterator<S> for CapturedParameters {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<VecDeque<String>> for CapturedParameters {
    fn from(segments: VecDeque<String>) -> Self {
        Self(segments.into())
    }
}

impl fmt::Display for CapturedParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// A record found for a request, with the parameters its wildcard captured.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedRecord {
    /// The matching record.
    pub record: ContentRecord,
    /// Segments consumed by the wildcard, empty for an exact hit.
    pub parameters: CapturedParameters,
}

/// Finds the record for `path`.
///
/// Returns `Ok(None)` when every decomposition misses. Store errors are
/// returned as-is and never reported as a miss. The site root is only
/// looked up exactly.
pub async fn resolve<S>(
    store: &S,
    path: &RequestPath,
    include_unpublished: bool,
) -> StorageResult<Option<ResolvedRecord>>
where
    S: RecordStore + ?Sized,
{
    let mut base = path.key();

    if let Some(record) = store.find_by_key(&base, include_unpublished).await? {
        debug!(key = %base, "Exact record hit");
        return Ok(Some(ResolvedRecord {
            record,
            parameters: CapturedParameters::new(),
        }));
    }

    if path.is_root() {
        return Ok(None);
    }

    let mut captured = VecDeque::new();
    while let Some(idx) = base.rfind(SEPARATOR) {
        captured.push_front(base[idx + 1..].to_string());
        base.truncate(idx);

        let key = format!("{}{}{}", base, SEPARATOR, WILDCARD);
        if let Some(record) = store.find_by_key(&key, include_unpublished).await? {
            let parameters = CapturedParameters::from(captured);
            debug!(key = %key, parameters = %parameters, "Wildcard record hit");
            return Ok(Some(ResolvedRecord { record, parameters }));
        }
    }

    debug!(path = %path, "No record matched");
    Ok(None)
}
