//! Lectern content engine.
//!
//! Turns a request path into a response decision: a rendered page, a
//! redirect, or a static status. The engine is storage agnostic and reads
//! everything through [`lectern_persistence::core::RecordStore`].
//!
//! # Pipeline
//!
//! 1. [`path::RequestPath`] normalizes the raw path and notes its suffix form.
//! 2. [`resolver::resolve`] finds the record, capturing wildcard parameters.
//! 3. On a miss, [`redirect::resolve_redirect`] consults the redirect table.
//! 4. [`canonical::enforce`] redirects requests that used the wrong suffix.
//! 5. [`directive::Interpreter`] executes the record's content blob.
//! 6. [`page::assemble`] merges the result with record metadata.
//!
//! [`Engine`] drives the whole pipeline for one [`PageRequest`].
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use lectern_engine::{Engine, EngineSettings, Outcome, PageRequest};
//! use lectern_persistence::backends::memory::MemoryStore;
//! use lectern_persistence::types::{ContentRecord, RecordId};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryStore::new()
//!     .with_record(ContentRecord::new(RecordId::new(1), "/", "Home", "Welcome"));
//! let engine = Engine::new(Arc::new(store), EngineSettings::default());
//!
//! let outcome = engine.handle(&PageRequest::new("/")).await.unwrap();
//! assert!(matches!(outcome, Outcome::Page(_)));
//! # }
//! ```

#![warn(missing_docs)]

pub mod breadcrumb;
pub mod canonical;
pub mod directive;
pub mod engine;
pub mod error;
pub mod page;
pub mod path;
pub mod redirect;
pub mod render;
pub mod resolver;
pub mod settings;

pub use engine::{Engine, Outcome, PageRequest};
pub use error::{EngineError, EngineResult};
pub use settings::EngineSettings;
