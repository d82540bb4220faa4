//! SQLite store implementation.
//!
//! Supports in-memory databases (tests, demos) and file-based databases.
//!
//! # Example
//!
//! ```no_run
//! use lectern_persistence::backends::sqlite::SqliteStore;
//! use lectern_persistence::core::RecordStore;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = SqliteStore::in_memory()?;
//! store.init_schema()?;
//!
//! let page = store.find_by_key("/about", false).await?;
//! assert!(page.is_none());
//! # Ok(())
//! # }
//! ```

mod backend;
mod schema;
mod storage;

pub use backend::{SqliteStore, SqliteStoreConfig};
pub use schema::SCHEMA_VERSION;
