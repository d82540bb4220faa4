//! In-memory record store.
//!
//! Keeps records and redirect rules in `BTreeMap`s behind a
//! [`parking_lot::RwLock`]. With [`MemoryStore::with_probe_log`] every key
//! probe is recorded so tests can assert exactly which lookups a resolution
//! performed. The log is off by default.

use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::core::{RecordStore, RecordWriter};
use crate::error::{BackendError, StorageError, StorageResult};
use crate::types::{ContentRecord, HierarchyEntry, RecordId, RedirectRule};

#[derive(Debug, Default)]
struct MemoryInner {
    records: BTreeMap<String, ContentRecord>,
    keys_by_id: HashMap<RecordId, String>,
    redirects: BTreeMap<String, RedirectRule>,
    probes: Vec<String>,
    record_probes: bool,
    offline: bool,
}

/// Record store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<MemoryInner>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Turns on the probe log read by [`probes`](Self::probes) and
    /// [`record_lookups`](Self::record_lookups).
    pub fn with_probe_log(self) -> Self {
        self.inner.write().record_probes = true;
        self
    }

    /// Adds a record, builder style.
    pub fn with_record(self, record: ContentRecord) -> Self {
        self.insert_record(record);
        self
    }

    /// Adds a redirect rule, builder style.
    pub fn with_redirect(self, rule: RedirectRule) -> Self {
        self.insert_redirect(rule);
        self
    }

    /// Inserts or replaces a record.
    pub fn insert_record(&self, record: ContentRecord) {
        let mut inner = self.inner.write();
        let (id, key) = (record.id(), record.key().to_string());
        if let Some(previous) = inner.records.insert(key.clone(), record) {
            inner.keys_by_id.remove(&previous.id());
        }
        inner.keys_by_id.insert(id, key);
    }

    /// Inserts or replaces a redirect rule.
    pub fn insert_redirect(&self, rule: RedirectRule) {
        self.inner
            .write()
            .redirects
            .insert(rule.source().to_string(), rule);
    }

    /// Returns every key probed so far, in order. Empty unless the store was
    /// built with [`with_probe_log`](Self::with_probe_log).
    ///
    /// Record lookups are logged as the bare key; redirect lookups are
    /// prefixed with `redirect:`.
    pub fn probes(&self) -> Vec<String> {
        self.inner.read().probes.clone()
    }

    /// Returns the number of record lookups performed so far.
    pub fn record_lookups(&self) -> usize {
        self.inner
            .read()
            .probes
            .iter()
            .filter(|p| !p.starts_with("redirect:"))
            .count()
    }

    /// Clears the probe log.
    pub fn reset_probes(&self) {
        self.inner.write().probes.clear();
    }

    /// Makes every subsequent lookup fail with an unavailable error.
    pub fn set_offline(&self, offline: bool) {
        self.inner.write().offline = offline;
    }

    fn log_probe(inner: &mut MemoryInner, probe: impl FnOnce() -> String) {
        if inner.record_probes {
            inner.probes.push(probe());
        }
    }

    fn check_online(inner: &MemoryInner) -> StorageResult<()> {
        if inner.offline {
            return Err(StorageError::Backend(BackendError::Unavailable {
                backend_name: "memory".to_string(),
                message: "store marked offline".to_string(),
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn find_by_key(
        &self,
        key: &str,
        include_unpublished: bool,
    ) -> StorageResult<Option<ContentRecord>> {
        let mut inner = self.inner.write();
        Self::log_probe(&mut inner, || key.to_string());
        Self::check_online(&inner)?;

        Ok(inner
            .records
            .get(key)
            .filter(|r| include_unpublished || r.is_published())
            .cloned())
    }

    async fn find_redirect(&self, candidates: &[String]) -> StorageResult<Option<RedirectRule>> {
        let mut inner = self.inner.write();
        for candidate in candidates {
            Self::log_probe(&mut inner, || format!("redirect:{}", candidate));
        }
        Self::check_online(&inner)?;

        Ok(candidates
            .iter()
            .filter_map(|c| inner.redirects.get(c))
            .find(|rule| !rule.is_wildcard())
            .cloned())
    }

    async fn find_wildcard_redirect(
        &self,
        key_with_wildcard: &str,
    ) -> StorageResult<Option<RedirectRule>> {
        let mut inner = self.inner.write();
        Self::log_probe(&mut inner, || format!("redirect:{}", key_with_wildcard));
        Self::check_online(&inner)?;

        Ok(inner.redirects.get(key_with_wildcard).cloned())
    }

    async fn load_ancestors(&self, id: RecordId) -> StorageResult<Vec<HierarchyEntry>> {
        let inner = self.inner.read();
        Self::check_online(&inner)?;

        let mut chain = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(id);
        while let Some(id) = next.filter(|id| seen.insert(*id)) {
            let Some(record) = inner.keys_by_id.get(&id).and_then(|k| inner.records.get(k)) else {
                break;
            };
            chain.push(HierarchyEntry::from(record));
            next = record.parent_id();
        }
        Ok(chain)
    }
}

#[async_trait]
impl RecordWriter for MemoryStore {
    async fn put_record(&self, record: ContentRecord) -> StorageResult<()> {
        self.insert_record(record);
        Ok(())
    }

    async fn put_redirect(&self, rule: RedirectRule) -> StorageResult<()> {
        self.insert_redirect(rule);
        Ok(())
    }
}
