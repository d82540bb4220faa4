//! Page assembly.
//!
//! Combines interpreter output with record metadata and the breadcrumb
//! trail into the structure handed to the HTTP layer.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use lectern_persistence::types::{ContentRecord, RecordId};
use regex::Regex;
use serde::Serialize;

use crate::breadcrumb::Breadcrumb;
use crate::directive::{MediaRef, PageAssembly, PageText};
use crate::path::RequestPath;
use crate::resolver::CapturedParameters;
use crate::settings::EngineSettings;

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid markup regex"));

/// A fully assembled page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    /// The record the page was rendered from.
    pub record_id: RecordId,
    /// The record's lookup key.
    pub key: String,
    /// Parameters captured by a wildcard key.
    pub parameters: CapturedParameters,
    /// Page heading; may contain markup.
    pub title: String,
    /// Plain-text title for the document head.
    pub browser_title: String,
    /// Rendered text.
    pub text: PageText,
    /// Breadcrumb trail from the top-level page.
    pub breadcrumbs: Vec<Breadcrumb>,
    /// Page authors.
    pub authors: Vec<String>,
    /// Attached media.
    pub media: Vec<MediaRef>,
    /// Last modification time.
    pub last_modified: DateTime<Utc>,
    /// Language declared by the request suffix.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Suppress the page header.
    pub no_header: bool,
    /// Suppress the page footer.
    pub no_footer: bool,
    /// Suppress the page heading.
    pub suppress_heading: bool,
    /// Show links to other language versions.
    pub language_links: bool,
}

impl Page {
    /// Returns the main text, using the configured default slot when the
    /// page has named slots.
    pub fn main_text<'a>(&'a self, settings: &EngineSettings) -> &'a str {
        self.text.main(&settings.default_slot)
    }
}

/// Assembles a page.
///
/// `trail` is the hierarchy trail from the top-level ancestor down to the
/// current record. When the interpreter produced breadcrumb extensions the
/// current record is dropped from the trail and the extensions follow.
pub fn assemble(
    record: &ContentRecord,
    parameters: CapturedParameters,
    assembly: PageAssembly,
    mut trail: Vec<Breadcrumb>,
    path: &RequestPath,
    settings: &EngineSettings,
) -> Page {
    let title = assembly
        .title
        .unwrap_or_else(|| record.title().to_string());

    let mut authors = assembly.authors;
    if authors.is_empty() {
        authors.extend(record.author().map(str::to_string));
    }

    if !assembly.breadcrumbs.is_empty() {
        trail.pop();
        trail.extend(assembly.breadcrumbs);
    }

    Page {
        record_id: record.id(),
        key: record.key().to_string(),
        parameters,
        browser_title: browser_title(&title, path.is_root(), &settings.project_name),
        title,
        text: assembly.text,
        breadcrumbs: trail,
        authors,
        media: assembly.media,
        last_modified: assembly.last_update.unwrap_or_else(|| record.last_modified()),
        language: path.language().map(str::to_string),
        no_header: assembly.no_header,
        no_footer: assembly.no_footer,
        suppress_heading: assembly.suppress_heading,
        language_links: assembly.language_links,
    }
}

/// Strips markup from `title` and appends the project name unless the page
/// is the site root.
pub fn browser_title(title: &str, is_root: bool, project_name: &str) -> String {
    let plain = MARKUP.replace_all(title, "");
    let plain = plain.trim();
    if is_root || project_name.is_empty() {
        plain.to_string()
    } else {
        format!("{} | {}", plain, project_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record() -> ContentRecord {
        ContentRecord::new(RecordId::new(3), "/docs/intro", "Intro", "")
            .with_author("alice")
            .with_last_modified(Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap())
    }

    fn trail() -> Vec<Breadcrumb> {
        vec![
            Breadcrumb::link("Home", "/"),
            Breadcrumb::link("Docs", "/docs"),
            Breadcrumb::link("Intro", "/docs/intro"),
        ]
    }

    fn path(raw: &str) -> RequestPath {
        RequestPath::parse(raw, "html")
    }

    #[test]
    fn test_record_fallbacks() {
        let page = assemble(
            &record(),
            CapturedParameters::new(),
            PageAssembly::default(),
            trail(),
            &path("/docs/intro/"),
            &EngineSettings::default(),
        );
        assert_eq!(page.title, "Intro");
        assert_eq!(page.browser_title, "Intro | Lectern");
        assert_eq!(page.authors, ["alice"]);
        assert_eq!(page.last_modified, record().last_modified());
        assert_eq!(page.breadcrumbs.len(), 3);
    }

    #[test]
    fn test_overrides_win() {
        let updated = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let assembly = PageAssembly {
            title: Some("<em>New</em> title".to_string()),
            authors: vec!["bob".to_string()],
            last_update: Some(updated),
            ..PageAssembly::default()
        };
        let page = assemble(
            &record(),
            CapturedParameters::new(),
            assembly,
            trail(),
            &path("/docs/intro.html.de"),
            &EngineSettings::default(),
        );
        assert_eq!(page.title, "<em>New</em> title");
        assert_eq!(page.browser_title, "New title | Lectern");
        assert_eq!(page.authors, ["bob"]);
        assert_eq!(page.last_modified, updated);
        assert_eq!(page.language.as_deref(), Some("de"));
    }

    #[test]
    fn test_breadcrumb_extensions_replace_current() {
        let assembly = PageAssembly {
            breadcrumbs: vec![Breadcrumb::text("Prices")],
            ..PageAssembly::default()
        };
        let page = assemble(
            &record(),
            CapturedParameters::new(),
            assembly,
            trail(),
            &path("/docs/intro/"),
            &EngineSettings::default(),
        );
        let titles: Vec<_> = page.breadcrumbs.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, ["Home", "Docs", "Prices"]);
    }

    #[test]
    fn test_root_browser_title() {
        assert_eq!(browser_title("Home", true, "Lectern"), "Home");
        assert_eq!(browser_title("<b>About</b>", false, "Site"), "About | Site");
    }

    #[test]
    fn test_main_text_uses_default_slot() {
        let mut slots = std::collections::BTreeMap::new();
        slots.insert("text".to_string(), "<p>main</p>".to_string());
        slots.insert("side".to_string(), "<p>aside</p>".to_string());
        let assembly = PageAssembly {
            text: PageText::Slots(slots),
            ..PageAssembly::default()
        };
        let page = assemble(
            &record(),
            CapturedParameters::new(),
            assembly,
            trail(),
            &path("/docs/intro/"),
            &EngineSettings::default(),
        );
        assert_eq!(page.main_text(&EngineSettings::default()), "<p>main</p>");
    }
}
