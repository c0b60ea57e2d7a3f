//! Content extraction module
//!
//! Turns fetched HTML into a [`ParsedPage`]: title, heading outline, content
//! blocks and plain text of the main content region.

mod extract;
mod page;
mod sections;

pub use extract::{collapse_whitespace, parse};
pub use page::{BlockKind, ContentBlock, Heading, ParsedPage};
pub use sections::{child_headings, section_end};
