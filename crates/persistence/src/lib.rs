//! Lectern Persistence Layer
//!
//! This crate provides the record store that the Lectern content engine reads
//! pages and redirect rules from. The engine itself never writes; writers are
//! only used for seeding and administration.
//!
//! # Features
//!
//! - **Pluggable stores**: every backend implements [`core::RecordStore`]
//! - **Access gating**: unpublished records are only returned on request
//! - **Redirect table**: exact and wildcard-terminated redirect rules
//! - **Hierarchy**: parent links used to build breadcrumb trails
//!
//! # Backend Features
//!
//! - `sqlite` (default) - SQLite with in-memory and file modes
//!
//! The in-memory store in [`backends::memory`] is always available.
//!
//! # Architecture
//!
//! - [`types`] - Content records, redirect rules and hierarchy entries
//! - [`error`] - Error types for all operations
//! - [`core`] - Store traits
//! - [`backends`] - Backend implementations
//! - [`seed`] - JSON seed documents for bootstrapping a store
//!
//! # Quick Start
//!
//! ```
//! use lectern_persistence::types::{CanonicalPolicy, ContentRecord, RecordId};
//!
//! let record = ContentRecord::new(RecordId::new(1), "/about", "About us", "Hello")
//!     .with_canonical(CanonicalPolicy::RequireSlash);
//!
//! assert_eq!(record.key(), "/about");
//! assert!(record.is_published());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod backends;
pub mod core;
pub mod error;
pub mod seed;
pub mod types;

pub use error::{StorageError, StorageResult};
