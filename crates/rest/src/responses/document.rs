//! HTML rendering of assembled pages.
//!
//! The document is deliberately minimal: site chrome is left to whatever
//! fronts the server. It carries the title, the breadcrumb trail, the main
//! text, one `<aside>` per additional slot, and header and footer blocks that
//! honor the page's suppress flags.

use lectern_engine::EngineSettings;
use lectern_engine::breadcrumb::Breadcrumb;
use lectern_engine::directive::PageText;
use lectern_engine::page::Page;
use lectern_engine::render::escape_html;

/// Renders `page` as a complete HTML document.
pub fn render_document(page: &Page, settings: &EngineSettings) -> String {
    let mut html = String::with_capacity(1024);

    html.push_str("<!DOCTYPE html>\n");
    match &page.language {
        Some(language) => html.push_str(&format!("<html lang=\"{}\">\n", escape_html(language))),
        None => html.push_str("<html>\n"),
    }
    html.push_str("<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!(
        "<title>{}</title>\n",
        escape_html(&page.browser_title)
    ));
    html.push_str("</head>\n<body>\n");

    if !page.no_header {
        html.push_str(&format!(
            "<header class=\"site-header\">{}</header>\n",
            escape_html(&settings.project_name)
        ));
    }

    if !page.breadcrumbs.is_empty() {
        html.push_str(&render_breadcrumbs(&page.breadcrumbs));
    }

    html.push_str("<main>\n");
    if !page.suppress_heading {
        html.push_str(&format!("<h1>{}</h1>\n", page.title));
    }
    html.push_str(page.main_text(settings));
    html.push_str("\n</main>\n");

    if let PageText::Slots(slots) = &page.text {
        for (name, text) in slots {
            if name == &settings.default_slot {
                continue;
            }
            html.push_str(&format!(
                "<aside data-slot=\"{}\">\n{}\n</aside>\n",
                escape_html(name),
                text
            ));
        }
    }

    for media in &page.media {
        html.push_str(&format!(
            "<figure><img src=\"{}\" alt=\"\">",
            escape_html(&media.url)
        ));
        if let Some(caption) = &media.caption {
            html.push_str(&format!("<figcaption>{}</figcaption>", escape_html(caption)));
        }
        html.push_str("</figure>\n");
    }

    if !page.no_footer {
        html.push_str(&render_footer(page));
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_breadcrumbs(trail: &[Breadcrumb]) -> String {
    let mut nav = String::from("<nav class=\"breadcrumbs\"><ol>");
    for crumb in trail {
        match &crumb.href {
            Some(href) => nav.push_str(&format!(
                "<li><a href=\"{}\">{}</a></li>",
                escape_html(href),
                crumb.title
            )),
            None => nav.push_str(&format!("<li>{}</li>", crumb.title)),
        }
    }
    nav.push_str("</ol></nav>\n");
    nav
}

fn render_footer(page: &Page) -> String {
    let mut footer = String::from("<footer class=\"site-footer\">");
    footer.push_str(&format!(
        "<time datetime=\"{}\">{}</time>",
        page.last_modified.to_rfc3339(),
        page.last_modified.format("%Y-%m-%d")
    ));
    if !page.authors.is_empty() {
        let authors: Vec<String> = page.authors.iter().map(|a| escape_html(a)).collect();
        footer.push_str(&format!(
            " <span class=\"authors\">{}</span>",
            authors.join(", ")
        ));
    }
    footer.push_str("</footer>\n");
    footer
}
