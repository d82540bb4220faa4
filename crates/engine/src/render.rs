//! Text rendering for literal content.

/// Converts literal markup to HTML.
///
/// Implementations must be pure; the interpreter may call them any number
/// of times per request.
pub trait TextRenderer: Send + Sync {
    /// Renders one literal segment.
    fn render(&self, markup: &str) -> String;
}

/// Default renderer: blank-line separated blocks become paragraphs.
///
/// Blocks that already start with a tag are passed through untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ParagraphRenderer;

impl TextRenderer for ParagraphRenderer {
    fn render(&self, markup: &str) -> String {
        let mut html = String::new();
        for block in split_blocks(markup) {
            if !html.is_empty() {
                html.push('\n');
            }
            if block.trim_start().starts_with('<') {
                html.push_str(block);
            } else {
                html.push_str("<p>");
                html.push_str(block);
                html.push_str("</p>");
            }
        }
        html
    }
}

fn split_blocks(markup: &str) -> impl Iterator<Item = &str> {
    markup
        .split("\n\n")
        .map(|block| block.trim_matches('\n'))
        .filter(|block| !block.trim().is_empty())
}

/// Escapes the five HTML special characters.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paragraphs() {
        let html = ParagraphRenderer.render("First\n\nSecond line\nstill second");
        assert_eq!(html, "<p>First</p>\n<p>Second line\nstill second</p>");
    }

    #[test]
    fn test_markup_blocks_pass_through() {
        let html = ParagraphRenderer.render("<ul><li>x</li></ul>\n\nAfter");
        assert_eq!(html, "<ul><li>x</li></ul>\n<p>After</p>");
    }

    #[test]
    fn test_inline_spaces_kept() {
        assert_eq!(ParagraphRenderer.render("Hello "), "<p>Hello </p>");
        assert_eq!(ParagraphRenderer.render("\n\n"), "");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
