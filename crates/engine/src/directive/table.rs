//! Embedded tables.
//!
//! A `table` directive hands a definition name to a [`TableSubsystem`],
//! which renders the table and supplies the page title and breadcrumb
//! extension. [`JsonTableDefinitions`] reads definitions from a directory
//! of JSON files:
//!
//! ```json
//! {
//!   "title": "Price list",
//!   "breadcrumb": "Prices",
//!   "columns": ["Item", "Price"],
//!   "rows": [["Tea", "2.50"], ["Cake", "3.00"]]
//! }
//! ```
//!
//! Parsed definitions are cached and re-read only when the file's
//! modification time changes, so a warm render costs one `stat`.

use std::collections::HashMap;
use std::fs;
use std::io::{self, ErrorKind};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use serde::Deserialize;
use tracing::debug;

use crate::breadcrumb::Breadcrumb;
use crate::error::TableError;
use crate::render::escape_html;
use crate::resolver::CapturedParameters;

/// A rendered table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableOutput {
    /// Table markup.
    pub html: String,
    /// Page title.
    pub title: String,
    /// Breadcrumb extension.
    pub breadcrumbs: Vec<Breadcrumb>,
}

/// Renders named table definitions.
pub trait TableSubsystem: Send + Sync {
    /// Renders `definition`. [`TableError::DefinitionMissing`] aborts the
    /// page; any other error is reported inline.
    fn render(
        &self,
        definition: &str,
        parameters: &CapturedParameters,
    ) -> Result<TableOutput, TableError>;
}

#[derive(Debug, Deserialize)]
struct TableDefinition {
    title: String,
    #[serde(default)]
    breadcrumb: Option<String>,
    columns: Vec<String>,
    #[serde(default)]
    rows: Vec<Vec<String>>,
}

#[derive(Debug)]
struct CachedDefinition {
    modified: SystemTime,
    definition: Arc<TableDefinition>,
}

/// Table definitions stored as `<dir>/<name>.json`.
#[derive(Debug, Clone)]
pub struct JsonTableDefinitions {
    dir: PathBuf,
    cache: Arc<RwLock<HashMap<String, CachedDefinition>>>,
}

impl JsonTableDefinitions {
    /// Reads definitions from `dir`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: Arc::default(),
        }
    }

    fn load(&self, name: &str) -> Result<Arc<TableDefinition>, TableError> {
        if !is_valid_name(name) {
            return Err(TableError::DefinitionMissing(name.to_string()));
        }

        let path = self.dir.join(format!("{}.json", name));
        let modified = match fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(e) => {
                self.cache.write().remove(name);
                return Err(io_error(name, e));
            }
        };

        if let Some(cached) = self.cache.read().get(name)
            && cached.modified == modified
        {
            return Ok(Arc::clone(&cached.definition));
        }

        let definition = Arc::new(read_definition(name, &path)?);
        self.cache.write().insert(
            name.to_string(),
            CachedDefinition {
                modified,
                definition: Arc::clone(&definition),
            },
        );
        Ok(definition)
    }
}

fn io_error(name: &str, e: io::Error) -> TableError {
    match e.kind() {
        ErrorKind::NotFound => TableError::DefinitionMissing(name.to_string()),
        _ => TableError::Io {
            name: name.to_string(),
            source: e,
        },
    }
}

fn read_definition(name: &str, path: &Path) -> Result<TableDefinition, TableError> {
    let text = fs::read_to_string(path).map_err(|e| io_error(name, e))?;

    let definition: TableDefinition =
        serde_json::from_str(&text).map_err(|e| TableError::Malformed {
            name: name.to_string(),
            message: e.to_string(),
        })?;

    if let Some(row) = definition
        .rows
        .iter()
        .position(|row| row.len() != definition.columns.len())
    {
        return Err(TableError::Malformed {
            name: name.to_string(),
            message: format!(
                "row {} has {} cells, expected {}",
                row,
                definition.rows[row].len(),
                definition.columns.len()
            ),
        });
    }

    debug!(table = name, path = %path.display(), "Loaded table definition");
    Ok(definition)
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl TableSubsystem for JsonTableDefinitions {
    fn render(
        &self,
        definition: &str,
        _parameters: &CapturedParameters,
    ) -> Result<TableOutput, TableError> {
        let table = self.load(definition)?;

        let mut html = String::from("<table class=\"lectern-table\">\n<thead><tr>");
        for column in &table.columns {
            html.push_str(&format!("<th>{}</th>", escape_html(column)));
        }
        html.push_str("</tr></thead>\n<tbody>\n");
        for row in &table.rows {
            html.push_str("<tr>");
            for cell in row {
                html.push_str(&format!("<td>{}</td>", escape_html(cell)));
            }
            html.push_str("</tr>\n");
        }
        html.push_str("</tbody>\n</table>");

        let crumb = table.breadcrumb.clone().unwrap_or_else(|| table.title.clone());
        Ok(TableOutput {
            html,
            title: table.title.clone(),
            breadcrumbs: vec![Breadcrumb::text(crumb)],
        })
    }
}
