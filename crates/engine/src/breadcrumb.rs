//! Breadcrumb trails.

use std::collections::{HashMap, HashSet};

use lectern_persistence::types::{HierarchyEntry, RecordId};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// One entry of a breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Breadcrumb {
    /// Text shown for the entry.
    pub title: String,
    /// Link target, `None` for an unlinked entry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl Breadcrumb {
    /// Creates a linked breadcrumb.
    pub fn link(title: impl Into<String>, href: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: Some(href.into()),
        }
    }

    /// Creates an unlinked breadcrumb.
    pub fn text(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            href: None,
        }
    }
}

/// Builds the trail from the top-level ancestor down to `current`.
///
/// Walks parent links iteratively. A parent that is not in `entries` ends
/// the walk; a record visited twice is a configuration error.
pub fn build_trail(entries: &[HierarchyEntry], current: RecordId) -> EngineResult<Vec<Breadcrumb>> {
    let by_id: HashMap<RecordId, &HierarchyEntry> = entries.iter().map(|e| (e.id, e)).collect();

    let mut trail = Vec::new();
    let mut visited = HashSet::new();
    let mut next = Some(current);

    while let Some(id) = next {
        if !visited.insert(id) {
            return Err(EngineError::HierarchyCycle { id });
        }
        let Some(entry) = by_id.get(&id) else {
            break;
        };
        trail.push(Breadcrumb::link(&entry.title, &entry.key));
        next = entry.parent_id;
    }

    trail.reverse();
    Ok(trail)
}
