//! Core store traits.
//!
//! - [`RecordStore`] - Read access used by the content engine
//! - [`RecordWriter`] - Write access used for seeding and administration
//!
//! # Example: Implementing a Store
//!
//! ```ignore
//! use async_trait::async_trait;
//! use lectern_persistence::core::RecordStore;
//!
//! struct FileStore { /* ... */ }
//!
//! #[async_trait]
//! impl RecordStore for FileStore {
//!     fn backend_name(&self) -> &'static str { "file" }
//!     // find_by_key, find_redirect, find_wildcard_redirect, load_ancestors ...
//! }
//! ```

mod store;

pub use store::{RecordStore, RecordWriter};
