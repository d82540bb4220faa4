//! Directive interpreter.
//!
//! Walks the segments of a content blob in order, rendering literals and
//! executing directives into a set of output slots. All mutable state of a
//! single run lives in [`InterpreterState`].

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use lectern_persistence::types::{RecordId, WILDCARD};
use serde::Serialize;
use tracing::{debug, warn};

use crate::breadcrumb::Breadcrumb;
use crate::error::{InterpretError, TableError};
use crate::render::{ParagraphRenderer, TextRenderer, escape_html};
use crate::resolver::CapturedParameters;

use super::Directive;
use super::fragment::{Fragment, FragmentText, MediaRef};
use super::registry::{FunctionCall, FunctionRegistry};
use super::segment::{ContentSegment, normalize_line_endings, split_segments};
use super::table::TableSubsystem;

const CLOSING_PARAGRAPH: &str = "</p>";
const OPENING_PARAGRAPH: &str = "<p>";

/// Name of an output slot.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SlotName {
    /// The buffer used before any slot switch.
    Unnamed,
    /// A slot selected with a `slot` directive.
    Named(String),
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotName::Unnamed => f.write_str("(unnamed)"),
            SlotName::Named(name) => f.write_str(name),
        }
    }
}

/// Rendered page text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PageText {
    /// Only the unnamed buffer was used.
    Single(String),
    /// Named slots.
    Slots(BTreeMap<String, String>),
}

impl Default for PageText {
    fn default() -> Self {
        PageText::Single(String::new())
    }
}

impl PageText {
    /// Returns the text of a named slot.
    pub fn slot(&self, name: &str) -> Option<&str> {
        match self {
            PageText::Single(_) => None,
            PageText::Slots(slots) => slots.get(name).map(String::as_str),
        }
    }

    /// Returns the main text: the single value, or the `default_slot` slot.
    pub fn main(&self, default_slot: &str) -> &str {
        match self {
            PageText::Single(text) => text,
            PageText::Slots(slots) => slots.get(default_slot).map(String::as_str).unwrap_or(""),
        }
    }
}

/// Everything the interpreter produced for a page.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageAssembly {
    /// Per-slot text.
    pub text: PageText,
    /// Title override.
    pub title: Option<String>,
    /// Breadcrumb entries appended after the hierarchy trail.
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Authors contributed by functions.
    pub authors: Vec<String>,
    /// Media contributed by functions.
    pub media: Vec<MediaRef>,
    /// Suppress the page header.
    pub no_header: bool,
    /// Suppress the page footer.
    pub no_footer: bool,
    /// Suppress the page heading.
    pub suppress_heading: bool,
    /// Show links to other language versions.
    pub language_links: bool,
    /// Last-modified override.
    pub last_update: Option<DateTime<Utc>>,
    /// Slots whose content was replaced by a function.
    pub replaced: BTreeSet<SlotName>,
}

/// Result of interpreting a content blob.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    /// A page to render.
    Page(PageAssembly),
    /// A `redirect` directive stopped interpretation.
    Redirect(String),
}

/// Mutable state of one interpreter run.
#[derive(Debug, Clone)]
pub struct InterpreterState {
    active: SlotName,
    buffers: BTreeMap<SlotName, String>,
    stitch_pending: Option<SlotName>,
    assembly: PageAssembly,
}

impl Default for InterpreterState {
    fn default() -> Self {
        Self::new()
    }
}

impl InterpreterState {
    /// Creates a state writing to the unnamed buffer.
    pub fn new() -> Self {
        let mut buffers = BTreeMap::new();
        buffers.insert(SlotName::Unnamed, String::new());
        Self {
            active: SlotName::Unnamed,
            buffers,
            stitch_pending: None,
            assembly: PageAssembly::default(),
        }
    }

    /// Returns the active slot.
    pub fn active(&self) -> &SlotName {
        &self.active
    }

    /// Makes `name` the active slot.
    pub fn switch_slot(&mut self, name: impl Into<String>) {
        self.close_pending();
        let slot = SlotName::Named(name.into());
        self.buffers.entry(slot.clone()).or_default();
        self.active = slot;
    }

    /// Returns false while the active slot is owned by a replacing function.
    pub fn accepts_literals(&self) -> bool {
        !self.assembly.replaced.contains(&self.active)
    }

    /// Appends rendered literal text, removing a leading `<p>` when the
    /// previous function result was stitched into a paragraph.
    pub fn push_literal(&mut self, html: &str) {
        if html.is_empty() || !self.accepts_literals() {
            return;
        }
        let mut text = html;
        if self.stitch_pending.as_ref() == Some(&self.active) {
            self.stitch_pending = None;
            match html.strip_prefix(OPENING_PARAGRAPH) {
                Some(rest) => text = rest,
                None => self.active_buffer().push_str(CLOSING_PARAGRAPH),
            }
        }
        self.active_buffer().push_str(text);
    }

    /// Appends an inline error notice to the active slot.
    pub fn push_notice(&mut self, message: &str) {
        let notice = format!(
            "<div class=\"directive-error\">{}</div>",
            escape_html(message)
        );
        self.active_buffer().push_str(&notice);
    }

    /// Merges a function result.
    pub fn apply(&mut self, fragment: Fragment) {
        match fragment.text {
            FragmentText::None => {
                if fragment.replace {
                    self.claim(self.active.clone());
                }
            }
            FragmentText::Single(text) => {
                let slot = self.active.clone();
                if fragment.replace {
                    self.claim(slot);
                } else {
                    self.stitch(&text);
                }
                self.active_buffer().push_str(&text);
            }
            FragmentText::Slots(slots) => {
                for (name, text) in slots {
                    let slot = SlotName::Named(name);
                    if fragment.replace {
                        self.claim(slot.clone());
                    }
                    self.buffers.entry(slot).or_default().push_str(&text);
                }
            }
        }

        let assembly = &mut self.assembly;
        if fragment.title.is_some() {
            assembly.title = fragment.title;
        }
        if fragment.last_update.is_some() {
            assembly.last_update = fragment.last_update;
        }
        assembly.authors.extend(fragment.authors);
        assembly.media.extend(fragment.media);
        if let Some(breadcrumbs) = fragment.breadcrumbs {
            assembly.breadcrumbs = breadcrumbs;
        }
        if let Some(no_header) = fragment.no_header {
            assembly.no_header = no_header;
        }
        if let Some(no_footer) = fragment.no_footer {
            assembly.no_footer = no_footer;
        }
        if let Some(language_links) = fragment.language_links {
            assembly.language_links = language_links;
        }
    }

    fn apply_table(&mut self, output: super::table::TableOutput) {
        self.active_buffer().push_str(&output.html);
        self.assembly.title = Some(output.title);
        self.assembly.breadcrumbs = output.breadcrumbs;
        self.assembly.suppress_heading = true;
    }

    fn claim(&mut self, slot: SlotName) {
        if self.stitch_pending.as_ref() == Some(&slot) {
            self.stitch_pending = None;
        }
        self.buffers.insert(slot.clone(), String::new());
        self.assembly.replaced.insert(slot);
    }

    /// Inline text joins the paragraph it follows: the paragraph's closing
    /// tag is dropped here and the next literal's opening tag later.
    fn stitch(&mut self, text: &str) {
        if text.is_empty() || text.starts_with('<') || text.ends_with('>') {
            return;
        }
        let buffer = self.active_buffer();
        let kept = buffer.trim_end().len();
        if buffer[..kept].ends_with(CLOSING_PARAGRAPH) {
            buffer.truncate(kept - CLOSING_PARAGRAPH.len());
            self.stitch_pending = Some(self.active.clone());
        }
    }

    /// Closes a stitched paragraph that no literal continued.
    fn close_pending(&mut self) {
        if let Some(slot) = self.stitch_pending.take() {
            self.buffers
                .entry(slot)
                .or_default()
                .push_str(CLOSING_PARAGRAPH);
        }
    }

    fn active_buffer(&mut self) -> &mut String {
        self.buffers.entry(self.active.clone()).or_default()
    }

    /// Finishes the run. The unnamed buffer is dropped when named slots
    /// exist; otherwise the text collapses to a single value.
    pub fn finish(mut self) -> PageAssembly {
        self.close_pending();
        let unnamed = self.buffers.remove(&SlotName::Unnamed).unwrap_or_default();
        let named: BTreeMap<String, String> = self
            .buffers
            .into_iter()
            .filter_map(|(slot, text)| match slot {
                SlotName::Named(name) => Some((name, text)),
                SlotName::Unnamed => None,
            })
            .collect();

        self.assembly.text = if named.is_empty() {
            PageText::Single(unnamed)
        } else {
            PageText::Slots(named)
        };
        self.assembly
    }
}

/// Executes content blobs.
#[derive(Clone)]
pub struct Interpreter {
    registry: Arc<FunctionRegistry>,
    renderer: Arc<dyn TextRenderer>,
    tables: Option<Arc<dyn TableSubsystem>>,
}

impl fmt::Debug for Interpreter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interpreter")
            .field("registry", &self.registry)
            .field("tables", &self.tables.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new(FunctionRegistry::with_builtins())
    }
}

impl Interpreter {
    /// Creates an interpreter with the paragraph renderer and no tables.
    pub fn new(registry: FunctionRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
            renderer: Arc::new(ParagraphRenderer),
            tables: None,
        }
    }

    /// Replaces the text renderer.
    pub fn with_renderer<R: TextRenderer + 'static>(mut self, renderer: R) -> Self {
        self.renderer = Arc::new(renderer);
        self
    }

    /// Enables the `table` directive.
    pub fn with_tables<T: TableSubsystem + 'static>(mut self, tables: T) -> Self {
        self.tables = Some(Arc::new(tables));
        self
    }

    /// Returns the function registry.
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Interprets `content` for the record `record_id`.
    pub fn interpret(
        &self,
        content: &str,
        parameters: &CapturedParameters,
        record_id: RecordId,
    ) -> Result<Interpretation, InterpretError> {
        let content = normalize_line_endings(content);
        let mut state = InterpreterState::new();

        for segment in split_segments(&content) {
            match segment {
                ContentSegment::Literal(text) => {
                    if state.accepts_literals() {
                        let html = self.renderer.render(text);
                        state.push_literal(&html);
                    }
                }
                ContentSegment::Directive(body) => match Directive::parse(body, parameters) {
                    Directive::Query { function, args } => {
                        self.call_function(&mut state, &function, &args, parameters, record_id);
                    }
                    Directive::Slot(name) => state.switch_slot(name),
                    Directive::Table { definition } => {
                        self.render_table(&mut state, definition, parameters)?;
                    }
                    Directive::Comment => {}
                    Directive::Redirect(target) => {
                        debug!(record = %record_id, target = %target, "Content requested redirect");
                        return Ok(Interpretation::Redirect(target));
                    }
                    Directive::Unknown(raw) if raw.is_empty() => {
                        state.push_notice("Empty directive");
                    }
                    Directive::Unknown(raw) => {
                        state.push_notice(&format!("Unknown directive: {}", raw));
                    }
                },
            }
        }

        Ok(Interpretation::Page(state.finish()))
    }

    fn call_function(
        &self,
        state: &mut InterpreterState,
        name: &str,
        args: &[String],
        parameters: &CapturedParameters,
        record_id: RecordId,
    ) {
        let Some(function) = self.registry.get(name) else {
            warn!(function = name, record = %record_id, "Unknown directive function");
            state.push_notice(&format!("Unknown function: {}", name));
            return;
        };

        let call = FunctionCall {
            name,
            args,
            parameters,
            record_id,
        };
        match function.call(&call) {
            Ok(fragment) => state.apply(fragment),
            Err(e) => {
                warn!(function = name, record = %record_id, error = %e, "Directive function failed");
                state.push_notice(&format!("Function {} failed: {}", name, e));
            }
        }
    }

    fn render_table(
        &self,
        state: &mut InterpreterState,
        definition: Option<String>,
        parameters: &CapturedParameters,
    ) -> Result<(), InterpretError> {
        let Some(name) = definition.or_else(|| table_from_parameters(parameters)) else {
            return Err(InterpretError::TableDefinitionMissing { definition: None });
        };

        let Some(tables) = &self.tables else {
            state.push_notice("Tables are not available");
            return Ok(());
        };

        match tables.render(&name, parameters) {
            Ok(output) => state.apply_table(output),
            Err(TableError::DefinitionMissing(missing)) => {
                return Err(InterpretError::TableDefinitionMissing {
                    definition: Some(missing),
                });
            }
            Err(e) => {
                warn!(table = %name, error = %e, "Table rendering failed");
                state.push_notice(&format!("Table {} failed: {}", name, e));
            }
        }
        Ok(())
    }
}

/// The last captured segment, or the one before it if the last is `*`.
fn table_from_parameters(parameters: &CapturedParameters) -> Option<String> {
    match parameters.segments() {
        [.., previous, last] if last == WILDCARD => Some(previous.clone()),
        [.., last] if last != WILDCARD => Some(last.clone()),
        _ => None,
    }
}
