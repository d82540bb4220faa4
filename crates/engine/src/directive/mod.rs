//! The embedded directive language.
//!
//! Content blobs interleave literal text with directives enclosed in
//! `%%%` delimiters:
//!
//! ```text
//! Welcome to our shop.
//! %%% query opening_hours "main store" %%%
//! %%% slot sidebar %%%
//! Call us any time.
//! ```
//!
//! Keywords are accepted in English and in their historical German form.
//!
//! | Directive | Keywords |
//! |-----------|----------|
//! | function call | `query`, `abfrage` |
//! | slot switch | `slot`, `position` |
//! | embedded table | `table`, `tabelle` |
//! | comment | `comment`, `kommentar`, `#` |
//! | redirect | `redirect`, `weiterleitung` |

mod builtins;
mod fragment;
mod interpreter;
mod registry;
mod segment;
mod table;

pub use builtins::register_builtins;
pub use fragment::{Fragment, FragmentText, MediaRef};
pub use interpreter::{
    Interpretation, Interpreter, InterpreterState, PageAssembly, PageText, SlotName,
};
pub use registry::{DirectiveFunction, FunctionCall, FunctionRegistry};
pub use segment::{ContentSegment, DELIMITER, normalize_line_endings, split_segments, tokenize};
pub use table::{JsonTableDefinitions, TableOutput, TableSubsystem};

use lectern_persistence::types::{SEPARATOR, WILDCARD};
use url::Url;

use crate::resolver::CapturedParameters;

/// A parsed directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Call a registered function.
    Query {
        /// Function name as written.
        function: String,
        /// Arguments after quote reassembly and wildcard expansion.
        args: Vec<String>,
    },
    /// Switch the active output slot.
    Slot(String),
    /// Render an embedded table.
    Table {
        /// Explicit definition name, if given.
        definition: Option<String>,
    },
    /// Produces nothing.
    Comment,
    /// Stop interpreting and redirect to a validated target.
    Redirect(String),
    /// Anything else, with the raw directive text.
    Unknown(String),
}

impl Directive {
    /// Parses a raw directive body.
    pub fn parse(body: &str, parameters: &CapturedParameters) -> Self {
        let tokens = tokenize(body);
        let Some(keyword) = tokens.first() else {
            return Directive::Unknown(String::new());
        };

        match keyword.to_lowercase().as_str() {
            "query" | "abfrage" => match tokens.get(1) {
                Some(function) => Directive::Query {
                    function: function.to_string(),
                    args: expand_wildcards(reassemble_quotes(&tokens[2..]), parameters),
                },
                None => Directive::Unknown(body.trim().to_string()),
            },
            "slot" | "position" => match tokens.get(1) {
                Some(name) => Directive::Slot(name.to_string()),
                None => Directive::Unknown(body.trim().to_string()),
            },
            "table" | "tabelle" => Directive::Table {
                definition: tokens.get(1).map(|d| d.to_string()),
            },
            "comment" | "kommentar" | "#" => Directive::Comment,
            "redirect" | "weiterleitung" => match tokens.get(1) {
                Some(target) if is_valid_redirect_target(target) => {
                    Directive::Redirect(target.to_string())
                }
                _ => Directive::Unknown(body.trim().to_string()),
            },
            _ => Directive::Unknown(body.trim().to_string()),
        }
    }
}

/// Joins `"quoted multi word"` arguments back into one argument.
///
/// An unterminated quote swallows the remaining tokens.
fn reassemble_quotes(tokens: &[&str]) -> Vec<String> {
    let mut args = Vec::new();
    let mut open: Option<Vec<&str>> = None;

    for &token in tokens {
        match open.as_mut() {
            Some(words) => {
                if let Some(last) = token.strip_suffix('"') {
                    words.push(last);
                    args.push(words.join(" "));
                    open = None;
                } else {
                    words.push(token);
                }
            }
            None => match token.strip_prefix('"') {
                Some(rest) if !rest.is_empty() && rest.ends_with('"') => {
                    args.push(rest[..rest.len() - 1].to_string());
                }
                Some(rest) => open = Some(vec![rest]),
                None => args.push(token.to_string()),
            },
        }
    }

    if let Some(words) = open {
        args.push(words.join(" "));
    }
    args
}

/// Replaces every `*` argument with all captured segments.
///
/// Each `*` expands independently, so two of them repeat the segments.
fn expand_wildcards(args: Vec<String>, parameters: &CapturedParameters) -> Vec<String> {
    let mut expanded = Vec::with_capacity(args.len());
    for arg in args {
        if arg == WILDCARD {
            expanded.extend(parameters.segments().iter().cloned());
        } else {
            expanded.push(arg);
        }
    }
    expanded
}

fn is_valid_redirect_target(target: &str) -> bool {
    if target.starts_with(SEPARATOR) {
        return !target.starts_with("//");
    }
    match Url::parse(target) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
