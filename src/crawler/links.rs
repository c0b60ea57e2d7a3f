//! Link extraction from fetched pages
//!
//! # Link Extraction Rules
//!
//! **Include:**
//! - `<a href="...">` anywhere in the document, including page chrome
//!
//! **Exclude:**
//! - `<a href="..." download>`
//! - `javascript:`, `mailto:`, `tel:` links
//! - Data URIs
//! - Fragment-only links (same page anchors)
//!
//! `rel="nofollow"` links are followed. Admission (domain, extension, robots)
//! is decided by the crawler, not here.

use scraper::{Html, Selector};
use url::Url;

/// Extracts all followable anchor targets, resolved against `base_url`
///
/// # Example
///
/// ```
/// use docmap::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/guide">Guide</a><a href="mailto:a@b.c">Mail</a></body></html>"#;
/// let base = Url::parse("https://example.com/docs").unwrap();
/// let links = extract_links(html, &base);
/// assert_eq!(links.len(), 1);
/// assert_eq!(links[0].as_str(), "https://example.com/guide");
/// ```
pub fn extract_links(html: &str, base_url: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&selector)
        .filter(|element| element.value().attr("download").is_none())
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL
///
/// Returns None for special schemes, fragment-only anchors and anything that
/// does not resolve to http(s).
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    matches!(absolute.scheme(), "http" | "https").then_some(absolute)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/docs/page").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        extract_links(html, &base_url())
            .into_iter()
            .map(|u| u.to_string())
            .collect()
    }

    #[test]
    fn test_extract_absolute_link() {
        let found = links(r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#);
        assert_eq!(found, vec!["https://other.com/page"]);
    }

    #[test]
    fn test_extract_root_relative_link() {
        let found = links(r#"<html><body><a href="/other">Link</a></body></html>"#);
        assert_eq!(found, vec!["https://example.com/other"]);
    }

    #[test]
    fn test_extract_relative_path_link() {
        let found = links(r#"<html><body><a href="other">Link</a></body></html>"#);
        assert_eq!(found, vec!["https://example.com/docs/other"]);
    }

    #[test]
    fn test_links_in_nav_are_followed() {
        let found = links(r#"<html><body><nav><a href="/guide">Guide</a></nav></body></html>"#);
        assert_eq!(found, vec!["https://example.com/guide"]);
    }

    #[test]
    fn test_skip_special_schemes() {
        let html = r#"
            <html><body>
                <a href="javascript:void(0)">JS</a>
                <a href="JavaScript:alert(1)">JS upper</a>
                <a href="mailto:test@example.com">Email</a>
                <a href="tel:+1234567890">Call</a>
                <a href="data:text/html,<h1>Test</h1>">Data</a>
            </body></html>
        "#;
        assert!(links(html).is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let found = links(r#"<html><body><a href="/file.zip" download>Download</a></body></html>"#);
        assert!(found.is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let found = links(r##"<html><body><a href="#section">Jump</a></body></html>"##);
        assert!(found.is_empty());
    }

    #[test]
    fn test_follow_nofollow_links() {
        let found = links(r#"<html><body><a href="/page" rel="nofollow">Link</a></body></html>"#);
        assert_eq!(found, vec!["https://example.com/page"]);
    }

    #[test]
    fn test_mixed_valid_and_invalid_links() {
        let html = r#"
            <html>
            <body>
                <a href="/valid">Valid</a>
                <a href="javascript:alert('no')">Invalid</a>
                <a href="mailto:test@example.com">Invalid</a>
                <a href="/another-valid">Valid</a>
                <a>No href</a>
            </body>
            </html>
        "#;
        assert_eq!(links(html).len(), 2);
    }
}
