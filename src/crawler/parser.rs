//! HTML parser for extracting anchors and metadata
//!
//! This module handles parsing rendered HTML to extract:
//! - Anchor targets, raw and in document order
//! - Page title
//! - Document base URL override

use scraper::{Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// `href` values of every `<a>` in document order, untouched
    pub links: Vec<String>,

    /// `href` of the first `<base>` element, untouched
    pub base: Option<String>,
}

/// Parses HTML content and extracts anchors and metadata
///
/// # Link Extraction Rules
///
/// Every `<a href="...">` is reported as written, including `mailto:`,
/// `javascript:`, fragment-only and empty values. Resolution and filtering
/// happen in the archiver, which owns the scope rules. `download` anchors are
/// kept because PDF links commonly carry that attribute.
///
/// # Example
///
/// ```
/// use site_archiver::crawler::parse_html;
///
/// let html = r#"<html><head><title>Test</title></head><body><a href="/page">Link</a></body></html>"#;
/// let parsed = parse_html(html);
/// assert_eq!(parsed.title, Some("Test".to_string()));
/// assert_eq!(parsed.links, vec!["/page".to_string()]);
/// ```
pub fn parse_html(html: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        title: extract_title(&document),
        links: extract_links(&document),
        base: extract_base(&document),
    }
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts the first `<base href>`; later ones are ignored like in browsers
fn extract_base(document: &Html) -> Option<String> {
    let base_selector = Selector::parse("base[href]").ok()?;

    document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(str::to_string)
}

/// Extracts every anchor target from the HTML document
fn extract_links(document: &Html) -> Vec<String> {
    let Ok(a_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(str::to_string)
        .collect()
}
