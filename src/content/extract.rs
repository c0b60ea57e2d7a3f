//! Structured extraction from raw HTML
//!
//! Page chrome is removed from the tree first, so titles, headings, blocks and
//! plain text never see navigation, footers, ads or cookie banners.

use crate::content::{BlockKind, ContentBlock, Heading, ParsedPage};
use crate::DocmapError;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Blocks must be longer than this many characters
const MIN_BLOCK_CHARS: usize = 20;

const BOILERPLATE_SELECTOR_STR: &str = "header, footer, nav, aside, script, style, noscript, iframe, \
     .header, .footer, .navbar, .sidebar, .menu, .navigation, .nav-menu, .site-header, .site-footer, \
     .advertisement, .ads, .ad-banner, .cookie-banner, .cookie-consent, .social-share, .share-buttons";

static BOILERPLATE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(BOILERPLATE_SELECTOR_STR)
        .expect("Failed to parse boilerplate selector - this is a bug")
});

static TITLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("title").expect("Failed to parse title selector - this is a bug")
});

static H1_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h1").expect("Failed to parse h1 selector - this is a bug"));

static MAIN_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("main").expect("Failed to parse main selector - this is a bug")
});

static ARTICLE_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("article").expect("Failed to parse article selector - this is a bug")
});

static DIV_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("div[class]").expect("Failed to parse div selector - this is a bug"));

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("Failed to parse body selector - this is a bug")
});

static CONTENT_CLASS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)content|main|body|documentation").expect("Failed to compile content class regex")
});

/// Parses a page into title, headings, content blocks and plain text
///
/// Deterministic and offline.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `url` - The page URL, recorded on the page and on every heading
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Successfully parsed page
/// * `Err(DocmapError::HtmlParse)` - The input holds no document
///
/// # Example
///
/// ```
/// let html = r#"<html><head><title>Billing</title></head>
///     <body><nav>Home</nav><main><h1>Billing</h1>
///     <p>Billing covers invoices, refunds and payment methods.</p></main></body></html>"#;
/// let page = docmap::parse(html, "https://example.com/billing").unwrap();
/// assert_eq!(page.title, "Billing");
/// assert_eq!(page.headings.len(), 1);
/// assert_eq!(page.blocks.len(), 1);
/// assert!(!page.text.contains("Home"));
/// ```
pub fn parse(html: &str, url: &str) -> Result<ParsedPage, DocmapError> {
    if html.trim().is_empty() {
        return Err(DocmapError::HtmlParse {
            url: url.to_string(),
            message: "empty document".to_string(),
        });
    }

    let mut document = Html::parse_document(html);
    strip_boilerplate(&mut document);

    let title = extract_title(&document);
    let main = main_region(&document);
    let (headings, blocks) = extract_structure(&document, main, url);
    let text = collapse_whitespace(&main.text().collect::<Vec<_>>().join(" "));

    tracing::trace!(
        "Parsed {}: {} headings, {} blocks",
        url,
        headings.len(),
        blocks.len()
    );

    Ok(ParsedPage {
        url: url.to_string(),
        title,
        headings,
        blocks,
        text,
    })
}

/// Detaches every boilerplate element from the tree
fn strip_boilerplate(document: &mut Html) {
    let ids: Vec<_> = document
        .select(&BOILERPLATE_SELECTOR)
        .map(|element| element.id())
        .collect();

    for id in ids {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
}

/// `<title>` text, else the first `<h1>`, else empty
fn extract_title(document: &Html) -> String {
    let root = document.root_element();
    let from_title = root
        .select(&TITLE_SELECTOR)
        .next()
        .map(|element| element_text(&element))
        .filter(|title| !title.is_empty());

    from_title
        .or_else(|| {
            root.select(&H1_SELECTOR)
                .next()
                .map(|element| element_text(&element))
        })
        .unwrap_or_default()
}

/// First of `<main>`, `<article>`, a content-classed `<div>`, `<body>`
///
/// Lookups start from the root element: detached boilerplate nodes stay in
/// the arena and `Html::select` would still visit them.
fn main_region(document: &Html) -> ElementRef<'_> {
    let root = document.root_element();

    root.select(&MAIN_SELECTOR)
        .next()
        .or_else(|| root.select(&ARTICLE_SELECTOR).next())
        .or_else(|| {
            root.select(&DIV_SELECTOR).find(|div| {
                div.value()
                    .attr("class")
                    .is_some_and(|class| CONTENT_CLASS_RE.is_match(class))
            })
        })
        .or_else(|| root.select(&BODY_SELECTOR).next())
        .unwrap_or(root)
}

/// Collects headings from the whole page and blocks from the main region
///
/// A single document-order walk, so each block knows the last heading seen
/// before it.
fn extract_structure(
    document: &Html,
    main: ElementRef<'_>,
    url: &str,
) -> (Vec<Heading>, Vec<ContentBlock>) {
    let mut headings = Vec::new();
    let mut blocks = Vec::new();

    for element in document.root_element().descendants().filter_map(ElementRef::wrap) {
        let tag = element.value().name();

        if let Some(level) = heading_level(tag) {
            let text = element_text(&element);
            if !text.is_empty() {
                headings.push(Heading {
                    level,
                    text,
                    anchor_id: element.value().id().unwrap_or_default().to_string(),
                    source_url: url.to_string(),
                });
            }
            continue;
        }

        let Some(kind) = BlockKind::from_tag(tag) else {
            continue;
        };
        if !is_within(&element, &main) {
            continue;
        }

        let text = element_text(&element);
        if text.chars().count() > MIN_BLOCK_CHARS {
            blocks.push(ContentBlock {
                kind,
                text,
                section: headings.len().checked_sub(1),
            });
        }
    }

    (headings, blocks)
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        _ => None,
    }
}

fn is_within(element: &ElementRef<'_>, region: &ElementRef<'_>) -> bool {
    element.id() == region.id() || element.ancestors().any(|node| node.id() == region.id())
}

fn element_text(element: &ElementRef<'_>) -> String {
    collapse_whitespace(&element.text().collect::<String>())
}

/// Collapses runs of whitespace to single spaces and trims
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
