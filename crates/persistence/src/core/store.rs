//! Record store traits.
//!
//! The engine issues several lookups per request while it decomposes a path.
//! No transactional guarantee is required across them; each individual
//! lookup must be internally consistent.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::types::{ContentRecord, HierarchyEntry, RecordId, RedirectRule};

/// Read access to pages and redirect rules.
///
/// # Example
///
/// ```ignore
/// use lectern_persistence::core::RecordStore;
///
/// async fn show<S: RecordStore>(store: &S) -> lectern_persistence::StorageResult<()> {
///     if let Some(record) = store.find_by_key("/about", false).await? {
///         println!("{}: {}", record.key(), record.title());
///     }
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns a human-readable name for this store backend.
    fn backend_name(&self) -> &'static str;

    /// Finds the record stored under exactly `key`.
    ///
    /// Unpublished records are only returned when `include_unpublished` is set.
    async fn find_by_key(
        &self,
        key: &str,
        include_unpublished: bool,
    ) -> StorageResult<Option<ContentRecord>>;

    /// Finds a non-wildcard redirect rule whose source equals one of
    /// `candidates`.
    ///
    /// When several candidates have rules, the earliest candidate wins.
    async fn find_redirect(&self, candidates: &[String]) -> StorageResult<Option<RedirectRule>>;

    /// Finds the wildcard rule whose source equals `key_with_wildcard`
    /// (for example `/old/*`).
    async fn find_wildcard_redirect(
        &self,
        key_with_wildcard: &str,
    ) -> StorageResult<Option<RedirectRule>>;

    /// Loads the record `id` and every ancestor reachable through its
    /// parent links.
    ///
    /// Each record appears at most once, so a parent cycle still
    /// terminates. The walk stops at a parent that does not exist. The
    /// order of the returned entries is unspecified.
    async fn load_ancestors(&self, id: RecordId) -> StorageResult<Vec<HierarchyEntry>>;
}

/// Write access used to populate a store.
#[async_trait]
pub trait RecordWriter: Send + Sync {
    /// Inserts or replaces the record with the same key.
    async fn put_record(&self, record: ContentRecord) -> StorageResult<()>;

    /// Inserts or replaces the redirect rule with the same source.
    async fn put_redirect(&self, rule: RedirectRule) -> StorageResult<()>;
}

#[async_trait]
impl<T> RecordStore for Arc<T>
where
    T: RecordStore + ?Sized,
{
    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }

    async fn find_by_key(
        &self,
        key: &str,
        include_unpublished: bool,
    ) -> StorageResult<Option<ContentRecord>> {
        (**self).find_by_key(key, include_unpublished).await
    }

    async fn find_redirect(&self, candidates: &[String]) -> StorageResult<Option<RedirectRule>> {
        (**self).find_redirect(candidates).await
    }

    async fn find_wildcard_redirect(
        &self,
        key_with_wildcard: &str,
    ) -> StorageResult<Option<RedirectRule>> {
        (**self).find_wildcard_redirect(key_with_wildcard).await
    }

    async fn load_ancestors(&self, id: RecordId) -> StorageResult<Vec<HierarchyEntry>> {
        (**self).load_ancestors(id).await
    }
}
