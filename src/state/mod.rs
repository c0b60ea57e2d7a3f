//! State module for tracking crawl outcomes
//!
//! Every URL the crawler takes off the frontier ends in exactly one
//! [`PageState`]; the counts feed the run statistics.

mod page_state;

pub use page_state::PageState;
