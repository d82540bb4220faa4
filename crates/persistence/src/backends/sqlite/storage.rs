//! RecordStore implementation for SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{OptionalExtension, Row, params, params_from_iter};

use crate::core::{RecordStore, RecordWriter};
use crate::error::{StorageError, StorageResult};
use crate::types::{
    CanonicalPolicy, ContentRecord, HierarchyEntry, RecordId, RedirectDisposition, RedirectRule,
};

use super::backend::{SqliteStore, internal_error};

const PAGE_COLUMNS: &str =
    "id, key, parent_id, title, content, canonical, published, author, last_modified";

struct PageRow {
    id: i64,
    key: String,
    parent_id: Option<i64>,
    title: String,
    content: String,
    canonical: String,
    published: bool,
    author: Option<String>,
    last_modified: String,
}

impl PageRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            key: row.get(1)?,
            parent_id: row.get(2)?,
            title: row.get(3)?,
            content: row.get(4)?,
            canonical: row.get(5)?,
            published: row.get::<_, i64>(6)? != 0,
            author: row.get(7)?,
            last_modified: row.get(8)?,
        })
    }

    fn into_record(self) -> StorageResult<ContentRecord> {
        let canonical: CanonicalPolicy = self
            .canonical
            .parse()
            .map_err(|e: String| StorageError::malformed_record(&self.key, e))?;

        let last_modified = DateTime::parse_from_rfc3339(&self.last_modified)
            .map_err(|e| {
                StorageError::malformed_record(&self.key, format!("bad last_modified: {}", e))
            })?
            .with_timezone(&Utc);

        let mut record = ContentRecord::new(RecordId::new(self.id), self.key, self.title, self.content)
            .with_canonical(canonical)
            .with_published(self.published)
            .with_last_modified(last_modified);
        if let Some(parent) = self.parent_id {
            record = record.with_parent(RecordId::new(parent));
        }
        if let Some(author) = self.author {
            record = record.with_author(author);
        }
        Ok(record)
    }
}

fn redirect_from_parts(source: String, target: String, code: i64) -> StorageResult<RedirectRule> {
    let disposition = u16::try_from(code)
        .ok()
        .and_then(RedirectDisposition::from_code)
        .ok_or_else(|| {
            StorageError::malformed_redirect(&source, format!("unknown disposition {}", code))
        })?;
    Ok(RedirectRule::new(source, target, disposition))
}

#[async_trait]
impl RecordStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    async fn find_by_key(
        &self,
        key: &str,
        include_unpublished: bool,
    ) -> StorageResult<Option<ContentRecord>> {
        let conn = self.get_connection()?;

        let sql = format!(
            "SELECT {} FROM pages WHERE key = ?1 AND (published = 1 OR ?2)",
            PAGE_COLUMNS
        );
        let row = conn
            .query_row(&sql, params![key, include_unpublished], PageRow::from_row)
            .optional()
            .map_err(|e| internal_error(format!("Failed to read page '{}': {}", key, e)))?;

        row.map(PageRow::into_record).transpose()
    }

    async fn find_redirect(&self, candidates: &[String]) -> StorageResult<Option<RedirectRule>> {
        if candidates.is_empty() {
            return Ok(None);
        }
        let conn = self.get_connection()?;

        let placeholders = vec!["?"; candidates.len()].join(", ");
        let sql = format!(
            "SELECT source, target, code FROM redirects WHERE source IN ({})",
            placeholders
        );
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| internal_error(format!("Failed to prepare redirect lookup: {}", e)))?;
        let rows = stmt
            .query_map(params_from_iter(candidates.iter()), |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, i64>(2)?,
                ))
            })
            .map_err(|e| internal_error(format!("Failed to look up redirects: {}", e)))?;

        let mut found = Vec::new();
        for row in rows {
            let (source, target, code) =
                row.map_err(|e| internal_error(format!("Failed to read redirect: {}", e)))?;
            found.push(redirect_from_parts(source, target, code)?);
        }

        Ok(candidates.iter().find_map(|candidate| {
            found
                .iter()
                .find(|rule| rule.source() == candidate && !rule.is_wildcard())
                .cloned()
        }))
    }

    async fn find_wildcard_redirect(
        &self,
        key_with_wildcard: &str,
    ) -> StorageResult<Option<RedirectRule>> {
        let conn = self.get_connection()?;

        let row = conn
            .query_row(
                "SELECT source, target, code FROM redirects WHERE source = ?1",
                params![key_with_wildcard],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, i64>(2)?,
                    ))
                },
            )
            .optional()
            .map_err(|e| internal_error(format!("Failed to look up redirect: {}", e)))?;

        row.map(|(source, target, code)| redirect_from_parts(source, target, code))
            .transpose()
    }

    async fn load_ancestors(&self, id: RecordId) -> StorageResult<Vec<HierarchyEntry>> {
        let conn = self.get_connection()?;

        // UNION (not UNION ALL) drops rows already in the chain, which ends a cycle.
        let mut stmt = conn
            .prepare(
                "WITH RECURSIVE chain(id, parent_id, title, key) AS (
                     SELECT id, parent_id, title, key FROM pages WHERE id = ?1
                     UNION
                     SELECT p.id, p.parent_id, p.title, p.key
                     FROM pages p JOIN chain c ON p.id = c.parent_id
                 )
                 SELECT id, parent_id, title, key FROM chain",
            )
            .map_err(|e| internal_error(format!("Failed to prepare ancestor query: {}", e)))?;
        let rows = stmt
            .query_map(params![id.get()], |row| {
                Ok(HierarchyEntry {
                    id: RecordId::new(row.get(0)?),
                    parent_id: row.get::<_, Option<i64>>(1)?.map(RecordId::new),
                    title: row.get(2)?,
                    key: row.get(3)?,
                })
            })
            .map_err(|e| internal_error(format!("Failed to load ancestors: {}", e)))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| internal_error(format!("Failed to read ancestor row: {}", e)))
    }
}

#[async_trait]
impl RecordWriter for SqliteStore {
    async fn put_record(&self, record: ContentRecord) -> StorageResult<()> {
        let conn = self.get_connection()?;

        conn.execute(
            "INSERT INTO pages (id, key, parent_id, title, content, canonical, published, author, last_modified)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT(key) DO UPDATE SET
                parent_id = excluded.parent_id,
                title = excluded.title,
                content = excluded.content,
                canonical = excluded.canonical,
                published = excluded.published,
                author = excluded.author,
                last_modified = excluded.last_modified",
            params![
                record.id().get(),
                record.key(),
                record.parent_id().map(RecordId::get),
                record.title(),
                record.content(),
                record.canonical().as_str(),
                record.is_published(),
                record.author(),
                record.last_modified().to_rfc3339(),
            ],
        )
        .map_err(|e| match e {
            rusqlite::Error::SqliteFailure(err, _)
                if err.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StorageError::DuplicateKey {
                    entity: "record",
                    key: record.id().to_string(),
                }
            }
            other => internal_error(format!("Failed to write page '{}': {}", record.key(), other)),
        })?;

        tracing::debug!(key = %record.key(), id = %record.id(), "Stored page");
        Ok(())
    }

    async fn put_redirect(&self, rule: RedirectRule) -> StorageResult<()> {
        let conn = self.get_connection()?;

        conn.execute(
            "INSERT INTO redirects (source, target, code) VALUES (?1, ?2, ?3)
             ON CONFLICT(source) DO UPDATE SET target = excluded.target, code = excluded.code",
            params![rule.source(), rule.target(), rule.disposition().code()],
        )
        .map_err(|e| internal_error(format!("Failed to write redirect '{}': {}", rule.source(), e)))?;

        tracing::debug!(source = %rule.source(), target = %rule.target(), "Stored redirect");
        Ok(())
    }
}
