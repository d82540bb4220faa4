//! SQLite schema definitions and migrations.

use rusqlite::Connection;

use crate::error::{BackendError, StorageError, StorageResult};

use super::backend::internal_error;

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Initialize the database schema.
pub fn initialize_schema(conn: &Connection) -> StorageResult<()> {
    let current_version = get_schema_version(conn)?;

    if current_version == 0 {
        create_schema_v1(conn)?;
        set_schema_version(conn, 1)?;
        migrate_schema(conn, 1)?;
    } else if current_version < SCHEMA_VERSION {
        migrate_schema(conn, current_version)?;
    }

    Ok(())
}

fn get_schema_version(conn: &Connection) -> StorageResult<i32> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER NOT NULL
        )",
        [],
    )
    .map_err(|e| internal_error(format!("Failed to create schema_version table: {}", e)))?;

    let version: Option<i32> = conn
        .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        })
        .ok();

    Ok(version.unwrap_or(0))
}

fn set_schema_version(conn: &Connection, version: i32) -> StorageResult<()> {
    conn.execute("DELETE FROM schema_version", [])
        .map_err(|e| internal_error(format!("Failed to clear schema_version: {}", e)))?;

    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )
    .map_err(|e| internal_error(format!("Failed to set schema_version: {}", e)))?;

    Ok(())
}

fn create_schema_v1(conn: &Connection) -> StorageResult<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS pages (
            id INTEGER PRIMARY KEY,
            key TEXT NOT NULL UNIQUE,
            parent_id INTEGER,
            title TEXT NOT NULL,
            content TEXT NOT NULL,
            canonical TEXT NOT NULL DEFAULT 'slash',
            published INTEGER NOT NULL DEFAULT 1,
            author TEXT,
            last_modified TEXT NOT NULL
        )",
        [],
    )
    .map_err(|e| internal_error(format!("Failed to create pages table: {}", e)))?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS redirects (
            source TEXT PRIMARY KEY,
            target TEXT NOT NULL,
            code INTEGER NOT NULL DEFAULT 301
        )",
        [],
    )
    .map_err(|e| internal_error(format!("Failed to create redirects table: {}", e)))?;

    Ok(())
}

fn migrate_schema(conn: &Connection, from_version: i32) -> StorageResult<()> {
    let mut version = from_version;

    while version < SCHEMA_VERSION {
        match version {
            1 => {
                // v2: breadcrumb walks read the hierarchy by parent
                conn.execute(
                    "CREATE INDEX IF NOT EXISTS idx_pages_parent ON pages (parent_id)",
                    [],
                )
                .map_err(|e| {
                    StorageError::Backend(BackendError::MigrationError {
                        message: format!("v1 -> v2: {}", e),
                    })
                })?;
            }
            other => {
                return Err(StorageError::Backend(BackendError::MigrationError {
                    message: format!("no migration path from schema version {}", other),
                }));
            }
        }
        version += 1;
        set_schema_version(conn, version)?;
    }

    Ok(())
}
