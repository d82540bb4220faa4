//! Content record types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a content record.
///
/// Used for breadcrumb walks and by directive functions that look up
/// media attached to a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(i64);

impl RecordId {
    /// Creates a record ID.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Returns the raw integer value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which URL suffix a record must be requested with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CanonicalPolicy {
    /// `/path/` - trailing separator, no extension.
    #[default]
    RequireSlash,
    /// `/path.html` - extension, no trailing separator.
    RequireExtension,
    /// `/path` - neither.
    RequireNeither,
}

impl CanonicalPolicy {
    /// Returns the storage representation of this policy.
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalPolicy::RequireSlash => "slash",
            CanonicalPolicy::RequireExtension => "extension",
            CanonicalPolicy::RequireNeither => "neither",
        }
    }
}

impl fmt::Display for CanonicalPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CanonicalPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "slash" | "require-slash" => Ok(CanonicalPolicy::RequireSlash),
            "extension" | "require-extension" => Ok(CanonicalPolicy::RequireExtension),
            "neither" | "require-neither" => Ok(CanonicalPolicy::RequireNeither),
            other => Err(format!("unknown canonical policy '{}'", other)),
        }
    }
}

/// A stored page.
///
/// Records are owned by the store and read-only to the engine. The `key` is
/// the lookup key the URL resolver matches against, including its leading
/// separator (`/about`, `/blog/*`, `/`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentRecord {
    id: RecordId,
    key: String,
    #[serde(default)]
    parent_id: Option<RecordId>,
    title: String,
    content: String,
    #[serde(default)]
    canonical: CanonicalPolicy,
    #[serde(default = "default_published")]
    published: bool,
    #[serde(default)]
    author: Option<String>,
    #[serde(default = "Utc::now")]
    last_modified: DateTime<Utc>,
}

fn default_published() -> bool {
    true
}

impl ContentRecord {
    /// Creates a published record with the default canonical policy.
    pub fn new(
        id: RecordId,
        key: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            id,
            key: key.into(),
            parent_id: None,
            title: title.into(),
            content: content.into(),
            canonical: CanonicalPolicy::default(),
            published: true,
            author: None,
            last_modified: Utc::now(),
        }
    }

    /// Sets the parent record.
    pub fn with_parent(mut self, parent: RecordId) -> Self {
        self.parent_id = Some(parent);
        self
    }

    /// Sets the canonical suffix policy.
    pub fn with_canonical(mut self, policy: CanonicalPolicy) -> Self {
        self.canonical = policy;
        self
    }

    /// Sets the published flag.
    pub fn with_published(mut self, published: bool) -> Self {
        self.published = published;
        self
    }

    /// Sets the author reference.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Sets the last-modified timestamp.
    pub fn with_last_modified(mut self, at: DateTime<Utc>) -> Self {
        self.last_modified = at;
        self
    }

    /// Returns the record ID.
    pub fn id(&self) -> RecordId {
        self.id
    }

    /// Returns the lookup key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the parent record, if any.
    pub fn parent_id(&self) -> Option<RecordId> {
        self.parent_id
    }

    /// Returns the record title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the raw content blob.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the canonical suffix policy.
    pub fn canonical(&self) -> CanonicalPolicy {
        self.canonical
    }

    /// Returns true if the record is visible without preview access.
    pub fn is_published(&self) -> bool {
        self.published
    }

    /// Returns the author reference.
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Returns when the record was last modified.
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Returns true if the key ends with the wildcard marker.
    pub fn is_wildcard(&self) -> bool {
        self.key.ends_with(super::WILDCARD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_round_trip_through_str() {
        for policy in [
            CanonicalPolicy::RequireSlash,
            CanonicalPolicy::RequireExtension,
            CanonicalPolicy::RequireNeither,
        ] {
            assert_eq!(policy.as_str().parse::<CanonicalPolicy>(), Ok(policy));
        }
        assert!("sometimes".parse::<CanonicalPolicy>().is_err());
    }

    #[test]
    fn test_record_defaults() {
        let record = ContentRecord::new(RecordId::new(7), "/blog/*", "Blog", "");
        assert!(record.is_published());
        assert!(record.is_wildcard());
        assert_eq!(record.canonical(), CanonicalPolicy::RequireSlash);
        assert_eq!(record.parent_id(), None);
    }

    #[test]
    fn test_record_deserialize_applies_defaults() {
        let record: ContentRecord = serde_json::from_value(serde_json::json!({
            "id": 3,
            "key": "/contact",
            "title": "Contact",
            "content": "Write to us",
            "canonical": "require-extension"
        }))
        .unwrap();
        assert_eq!(record.id(), RecordId::new(3));
        assert!(record.is_published());
        assert_eq!(record.canonical(), CanonicalPolicy::RequireExtension);
    }
}
