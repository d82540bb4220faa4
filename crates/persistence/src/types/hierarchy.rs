use serde::{Deserialize, Serialize};

use super::record::{ContentRecord, RecordId};

/// One node of the page hierarchy: a record, its parent, and what a
/// breadcrumb for it displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyEntry {
    /// The record this entry describes.
    pub id: RecordId,
    /// Parent record, `None` for top-level pages.
    pub parent_id: Option<RecordId>,
    /// Title shown in the breadcrumb.
    pub title: String,
    /// Lookup key, used as the breadcrumb link.
    pub key: String,
}

impl From<&ContentRecord> for HierarchyEntry {
    fn from(record: &ContentRecord) -> Self {
        Self {
            id: record.id(),
            parent_id: record.parent_id(),
            title: record.title().to_string(),
            key: record.key().to_string(),
        }
    }
}
