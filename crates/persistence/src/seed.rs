//! JSON seed documents.
//!
//! A seed document bootstraps a store with pages and redirect rules:
//!
//! ```json
//! {
//!   "records": [
//!     { "id": 1, "key": "/", "title": "Home", "content": "Welcome" }
//!   ],
//!   "redirects": [
//!     { "source": "/old/*", "target": "/new/*", "code": 301 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::RecordWriter;
use crate::error::StorageResult;
use crate::types::{ContentRecord, RedirectRule};

/// Pages and redirect rules to load into a store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SeedDocument {
    /// Content records.
    #[serde(default)]
    pub records: Vec<ContentRecord>,
    /// Redirect rules.
    #[serde(default)]
    pub redirects: Vec<RedirectRule>,
}

/// Counts of what a seed run wrote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SeedSummary {
    /// Number of records written.
    pub records: usize,
    /// Number of redirect rules written.
    pub redirects: usize,
}

impl SeedDocument {
    /// Parses a seed document from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Writes every record and rule into `writer`.
    pub async fn apply<W>(&self, writer: &W) -> StorageResult<SeedSummary>
    where
        W: RecordWriter + ?Sized,
    {
        for record in &self.records {
            writer.put_record(record.clone()).await?;
        }
        for rule in &self.redirects {
            writer.put_redirect(rule.clone()).await?;
        }

        let summary = SeedSummary {
            records: self.records.len(),
            redirects: self.redirects.len(),
        };
        info!(
            records = summary.records,
            redirects = summary.redirects,
            "Applied seed document"
        );
        Ok(summary)
    }
}
