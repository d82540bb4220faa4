//! Request path normalization.
//!
//! A raw request path such as `/docs/intro.html.de` is reduced to its
//! segments (`docs`, `intro`), an optional language tag (`de`), and the
//! suffix form the client actually used. The resolver works on the
//! segments; the canonical enforcer compares the suffix form against the
//! record's policy.

use std::fmt;
use std::sync::LazyLock;

use lectern_persistence::types::SEPARATOR;
use regex::Regex;
use serde::Serialize;

static LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{2}(-[a-z]{2})?$").expect("valid language regex"));

/// Which suffix a request path ended with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SuffixForm {
    /// `/path/`
    Slash,
    /// `/path.html` or `/path.html.de`
    Extension,
    /// `/path`
    Bare,
}

/// A normalized request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPath {
    segments: Vec<String>,
    language: Option<String>,
    suffix: SuffixForm,
}

impl RequestPath {
    /// Parses a raw request path.
    ///
    /// `extension` is the page extension without its dot. An extension
    /// followed by a language tag (`.html.en-gb`) declares the language.
    pub fn parse(raw: &str, extension: &str) -> Self {
        let trimmed = raw.trim_start_matches(SEPARATOR);

        if trimmed.is_empty() {
            return Self {
                segments: Vec::new(),
                language: None,
                suffix: SuffixForm::Slash,
            };
        }

        let (body, language, suffix) = if let Some(stripped) = trimmed.strip_suffix(SEPARATOR) {
            (stripped.trim_end_matches(SEPARATOR), None, SuffixForm::Slash)
        } else {
            split_suffix(trimmed, extension)
        };

        let segments = body
            .split(SEPARATOR)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();

        Self {
            segments,
            language,
            suffix,
        }
    }

    /// Returns the path segments.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns the declared language tag, if any.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Returns the suffix form the request used.
    pub fn suffix(&self) -> SuffixForm {
        self.suffix
    }

    /// Returns true for the site root.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the exact lookup key: `/` followed by the joined segments.
    pub fn key(&self) -> String {
        let mut key = String::from(SEPARATOR);
        key.push_str(&self.segments.join("/"));
        key
    }
}

impl fmt::Display for RequestPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

fn split_suffix<'a>(path: &'a str, extension: &str) -> (&'a str, Option<String>, SuffixForm) {
    let dotted = format!(".{}", extension);

    if let Some((body, tail)) = path.rsplit_once('.') {
        if LANGUAGE_TAG.is_match(tail) {
            if let Some(base) = body.strip_suffix(&dotted) {
                return (base, Some(tail.to_string()), SuffixForm::Extension);
            }
        }
    }

    match path.strip_suffix(&dotted) {
        Some(base) => (base, None, SuffixForm::Extension),
        None => (path, None, SuffixForm::Bare),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> RequestPath {
        RequestPath::parse(raw, "html")
    }

    #[test]
    fn test_root() {
        for raw in ["", "/", "//"] {
            let path = parse(raw);
            assert!(path.is_root());
            assert_eq!(path.key(), "/");
        }
    }

    #[test]
    fn test_slash_form() {
        let path = parse("/a/b/c/");
        assert_eq!(path.segments(), ["a", "b", "c"]);
        assert_eq!(path.suffix(), SuffixForm::Slash);
        assert_eq!(path.key(), "/a/b/c");
    }

    #[test]
    fn test_extension_form() {
        let path = parse("/docs/intro.html");
        assert_eq!(path.segments(), ["docs", "intro"]);
        assert_eq!(path.suffix(), SuffixForm::Extension);
        assert_eq!(path.language(), None);
    }

    #[test]
    fn test_extension_with_language() {
        let path = parse("/docs/intro.html.de");
        assert_eq!(path.key(), "/docs/intro");
        assert_eq!(path.language(), Some("de"));
        assert_eq!(path.suffix(), SuffixForm::Extension);

        let regional = parse("/intro.html.en-gb");
        assert_eq!(regional.language(), Some("en-gb"));
    }

    #[test]
    fn test_bare_form() {
        let path = parse("/docs/intro");
        assert_eq!(path.suffix(), SuffixForm::Bare);
        assert_eq!(path.key(), "/docs/intro");
    }

    #[test]
    fn test_other_extensions_stay_in_segment() {
        let path = parse("/files/report.pdf");
        assert_eq!(path.segments(), ["files", "report.pdf"]);
        assert_eq!(path.suffix(), SuffixForm::Bare);

        let not_a_language = parse("/intro.html.german");
        assert_eq!(not_a_language.segments(), ["intro.html.german"]);
    }

    #[test]
    fn test_custom_extension() {
        let path = RequestPath::parse("/page.htm", "htm");
        assert_eq!(path.key(), "/page");
        assert_eq!(path.suffix(), SuffixForm::Extension);
    }
}
