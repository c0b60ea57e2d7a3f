use regex::Regex;
use std::sync::LazyLock;

/// Shortest accepted module or submodule name, in characters
pub const MIN_NAME_CHARS: usize = 3;

/// Longest kept name, in characters
const MAX_NAME_CHARS: usize = 100;

/// Decorative characters documentation sites put around headings
const MARKERS: &[char] = &['#', '*', '→', '►', '▼', '•'];

static OUTLINE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+(?:\.\d+)*(?:\.\s*|\s+)").expect("Failed to compile outline prefix regex")
});

/// Cleans heading text into a module or submodule name
///
/// Trims, strips a leading outline number such as `1.2.3 `, removes marker
/// characters and truncates to 100 characters. Returns an empty string when
/// fewer than three characters remain.
///
/// # Examples
///
/// ```
/// use docmap::inference::clean_heading;
///
/// assert_eq!(clean_heading("1.2 Getting Started"), "Getting Started");
/// assert_eq!(clean_heading("## "), "");
/// assert_eq!(clean_heading("► Billing"), "Billing");
/// ```
pub fn clean_heading(text: &str) -> String {
    let text = OUTLINE_PREFIX_RE.replace(text.trim(), "");
    let text: String = text.chars().filter(|c| !MARKERS.contains(c)).collect();
    let text: String = text.trim().chars().take(MAX_NAME_CHARS).collect();
    let text = text.trim();

    if text.chars().count() < MIN_NAME_CHARS {
        return String::new();
    }
    text.to_string()
}

/// Cleaned name, or None if the heading is rejected
pub(crate) fn heading_name(text: &str) -> Option<String> {
    Some(clean_heading(text)).filter(|name| !name.is_empty())
}
