//! HTML parser for extracting links and readable text
//!
//! This module handles parsing HTML content to extract:
//! - Anchor targets to follow, resolved against the page URL
//! - The main readable text of a page, for the harvested corpus

use scraper::{Html, Selector};
use url::Url;

/// Containers tried in order when extracting the readable text of a page
const CONTENT_SELECTORS: &[&str] = &["main", "article", "body"];

/// Extracts all followable anchor targets from an HTML page
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` anywhere in the document, resolved against `base_url`
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` links and data URIs
/// - Fragment-only links (same page anchors)
/// - Anything that is not HTTP(S) after resolution
///
/// Fragments and trailing slashes are left in place; the crawler
/// canonicalizes every target before queueing it.
///
/// # Example
///
/// ```
/// use docweave::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><a href="http://external.com">Ext</a>"#;
/// let base_url = Url::parse("http://example.com").unwrap();
/// let links = extract_links(html, &base_url);
/// assert_eq!(links, vec!["http://example.com/about", "http://external.com/"]);
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(absolute_url) = resolve_link(href, base_url) {
                    links.push(absolute_url);
                }
            }
        }
    }

    links
}

/// Resolves a link href to an absolute URL and validates it
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute_url) => {
            if absolute_url.scheme() == "http" || absolute_url.scheme() == "https" {
                Some(absolute_url.to_string())
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

/// Extracts the readable text of a page
///
/// The first of `<main>`, `<article>`, `<body>` that yields non-empty text
/// wins; otherwise the text of the whole document is used. Text nodes are
/// joined with newlines and the result is trimmed.
///
/// ```
/// use docweave::crawler::extract_main_text;
///
/// let html = "<html><body><nav>Menu</nav><main><h1>Title</h1><p>Body</p></main></body></html>";
/// assert_eq!(extract_main_text(html), "Title\nBody");
/// ```
pub fn extract_main_text(html: &str) -> String {
    let document = Html::parse_document(html);

    for selector in CONTENT_SELECTORS {
        let Ok(parsed) = Selector::parse(selector) else {
            continue;
        };

        if let Some(element) = document.select(&parsed).next() {
            let text = join_text(element.text());
            if !text.is_empty() {
                return text;
            }
        }
    }

    join_text(document.root_element().text())
}

fn join_text<'a>(nodes: impl Iterator<Item = &'a str>) -> String {
    nodes.collect::<Vec<_>>().join("\n").trim().to_string()
}
