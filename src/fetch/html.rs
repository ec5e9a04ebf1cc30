// src/fetch/html.rs
// =============================================================================
// This module extracts link targets from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Supports CSS selectors for finding elements
//
// We also use the `url` crate to resolve relative hrefs against the page.
//
// Note that nothing is filtered here: "javascript:" and "mailto:" targets are
// returned as-is. Deciding what is worth crawling is the crawler's job.
// =============================================================================

use scraper::{Html, Selector};
use tracing::warn;
use url::Url;

/// Turns a document body into the absolute targets of its anchors.
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, html: &str, base_url: &str) -> Vec<String>;
}

/// `<a href>` extraction with scraper.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, html: &str, base_url: &str) -> Vec<String> {
        extract_html_links(html, base_url)
    }
}

// Extracts all anchor targets from HTML content
//
// Example:
//   html = "<a href='/docs'>Docs</a>"
//   base_url = "https://example.com"
//   result = ["https://example.com/docs"]
pub fn extract_html_links(html: &str, base_url: &str) -> Vec<String> {
    let mut links = Vec::new();

    let Ok(selector) = Selector::parse("a[href]") else {
        return links;
    };

    let base = match Url::parse(base_url) {
        Ok(url) => url,
        Err(_) => {
            // If base URL is invalid, we can't resolve relative links
            warn!(base_url, "invalid base URL, skipping link extraction");
            return links;
        }
    };

    let document = Html::parse_document(html);

    for element in document.select(&selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_url(&base, href.trim()) {
                links.push(absolute_url);
            }
        }
    }

    links
}

// Resolves a possibly-relative URL to an absolute URL
//
// Examples:
//   base = "https://example.com/page"
//   href = "/docs"               -> Some("https://example.com/docs")
//   href = "../other"            -> Some("https://example.com/other")
//   href = "javascript:void(0)"  -> Some("javascript:void(0)")
fn resolve_url(base: &Url, href: &str) -> Option<String> {
    if href.is_empty() {
        return None;
    }

    match Url::parse(href) {
        Ok(url) => Some(url.to_string()),
        Err(_) => base.join(href).ok().map(|url| url.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_absolute_link() {
        let html = r#"<a href="https://www.rust-lang.org">Rust</a>"#;
        let links = extract_html_links(html, "https://example.com");
        assert_eq!(links, vec!["https://www.rust-lang.org/"]);
    }

    #[test]
    fn test_resolve_relative_link() {
        let html = r#"<a href="/docs">Docs</a>"#;
        let links = extract_html_links(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_keeps_non_http_targets() {
        let html = r#"<a href="mailto:test@example.com">Email</a><a href="javascript:void(0)">JS</a>"#;
        let links = HtmlLinkExtractor.extract_links(html, "https://example.com");
        assert_eq!(links, vec!["mailto:test@example.com", "javascript:void(0)"]);
    }

    #[test]
    fn test_fragment_survives_extraction() {
        let html = r##"<a href="#top">Top</a>"##;
        let links = extract_html_links(html, "https://example.com/page");
        assert_eq!(links, vec!["https://example.com/page#top"]);
    }

    #[test]
    fn test_skips_empty_href_and_bad_base() {
        let html = r#"<a href="">Nothing</a><a>No href</a>"#;
        assert!(extract_html_links(html, "https://example.com").is_empty());
        assert!(extract_html_links(r#"<a href="/x">X</a>"#, "not a url").is_empty());
    }

    #[test]
    fn test_multiple_links() {
        let html = r#"
            <a href="https://rust-lang.org">Rust</a>
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = extract_html_links(html, "https://example.com/page/");
        assert_eq!(links.len(), 3);
    }
}
