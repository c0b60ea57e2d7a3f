//! Forward scans over an ordered heading sequence
//!
//! A heading opens a section that runs until the next heading at the same or
//! a higher level (numerically lower or equal). Both the per-page section text
//! and the module/submodule grouping are built on these two scans.

use crate::content::Heading;

/// Index one past the last heading inside the section opened at `start`
///
/// # Example
///
/// ```
/// use docmap::content::{section_end, Heading};
///
/// let h = |level, text: &str| Heading {
///     level,
///     text: text.to_string(),
///     anchor_id: String::new(),
///     source_url: String::new(),
/// };
/// let headings = vec![h(1, "Billing"), h(2, "Invoices"), h(3, "Due dates"), h(1, "Accounts")];
/// assert_eq!(section_end(&headings, 0), 3);
/// assert_eq!(section_end(&headings, 1), 3);
/// assert_eq!(section_end(&headings, 3), 4);
/// ```
pub fn section_end(headings: &[Heading], start: usize) -> usize {
    let Some(opening) = headings.get(start) else {
        return headings.len();
    };

    headings[start + 1..]
        .iter()
        .position(|h| h.level <= opening.level)
        .map_or(headings.len(), |offset| start + 1 + offset)
}

/// Headings exactly one level below the one at `start`, within its section
///
/// Yields `(index, heading)` pairs in document order.
pub fn child_headings(headings: &[Heading], start: usize) -> impl Iterator<Item = (usize, &Heading)> {
    let end = section_end(headings, start);
    let child_level = headings.get(start).map(|h| h.level + 1);

    headings
        .iter()
        .enumerate()
        .take(end)
        .skip(start + 1)
        .filter(move |(_, h)| Some(h.level) == child_level)
}
