//! Splitting content blobs into literal and directive segments.

/// Delimiter that opens and closes a directive.
pub const DELIMITER: &str = "%%%";

/// One piece of a content blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentSegment<'a> {
    /// Text rendered as-is.
    Literal(&'a str),
    /// Raw directive body between two delimiters.
    Directive(&'a str),
}

/// Normalizes `\r\n` and lone `\r` line endings to `\n`.
pub fn normalize_line_endings(content: &str) -> String {
    content.replace("\r\n", "\n").replace('\r', "\n")
}

/// Splits content on the delimiter. Even positions are literals, odd
/// positions are directives, so the first segment is always a literal.
pub fn split_segments(content: &str) -> Vec<ContentSegment<'_>> {
    content
        .split(DELIMITER)
        .enumerate()
        .map(|(i, part)| {
            if i % 2 == 0 {
                ContentSegment::Literal(part)
            } else {
                ContentSegment::Directive(part)
            }
        })
        .collect()
}

/// Tokenizes a directive body.
///
/// The body is trimmed first. A multi-line body yields one token per
/// non-empty line; a single-line body is split on spaces.
pub fn tokenize(body: &str) -> Vec<&str> {
    let body = body.trim();
    if body.contains('\n') {
        body.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect()
    } else {
        body.split(' ').filter(|token| !token.is_empty()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_parity() {
        let segments = split_segments("a %%%x%%% b %%%y%%% c");
        assert_eq!(segments.len(), 5);
        assert_eq!(segments[0], ContentSegment::Literal("a "));
        assert_eq!(segments[1], ContentSegment::Directive("x"));
        assert_eq!(segments[4], ContentSegment::Literal(" c"));
    }

    #[test]
    fn test_leading_directive_starts_with_empty_literal() {
        let segments = split_segments("%%%x%%%");
        assert_eq!(
            segments,
            [
                ContentSegment::Literal(""),
                ContentSegment::Directive("x"),
                ContentSegment::Literal("")
            ]
        );
    }

    #[test]
    fn test_no_delimiter() {
        assert_eq!(split_segments("plain"), [ContentSegment::Literal("plain")]);
    }

    #[test]
    fn test_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
    }

    #[test]
    fn test_tokenize_single_line() {
        assert_eq!(tokenize("  query  foo   bar "), ["query", "foo", "bar"]);
    }

    #[test]
    fn test_tokenize_multi_line() {
        assert_eq!(
            tokenize("\nquery\n  foo\n\n  two words \n"),
            ["query", "foo", "two words"]
        );
    }

    #[test]
    fn test_tokenize_empty() {
        assert!(tokenize("   ").is_empty());
    }
}
