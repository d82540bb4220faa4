//! Core types for the persistence layer.
//!
//! - [`ContentRecord`] - A stored page with its content blob and metadata
//! - [`RedirectRule`] - A row of the redirect table
//! - [`HierarchyEntry`] - Parent link of a record, used for breadcrumbs
//!
//! # Examples
//!
//! ```
//! use lectern_persistence::types::{RedirectDisposition, RedirectRule};
//!
//! let rule = RedirectRule::new("/old/*", "/new/*", RedirectDisposition::Permanent);
//! assert!(rule.is_wildcard());
//! assert_eq!(rule.disposition().code(), 301);
//! ```

mod hierarchy;
mod record;
mod redirect;

pub use hierarchy::HierarchyEntry;
pub use record::{CanonicalPolicy, ContentRecord, RecordId};
pub use redirect::{RedirectDisposition, RedirectRule};

/// Marker appended to a truncated lookup key.
pub const WILDCARD: &str = "*";

/// Path separator used in lookup keys.
pub const SEPARATOR: char = '/';
