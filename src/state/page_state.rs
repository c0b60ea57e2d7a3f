/// Outcome definitions for URLs taken off the frontier
use std::fmt;

/// Terminal state of a URL after the crawler has dealt with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Success =====
    /// Page was fetched and is HTML
    Fetched,

    // ===== Skipped =====
    /// Refused by the admission filter (domain, extension, path, robots)
    Filtered,

    // ===== Errors =====
    /// Page returned HTTP 404/410
    DeadLink,

    /// Page could not be reached (timeout, connection refused, DNS failure)
    Unreachable,

    /// Page still returned HTTP 429 after retries
    RateLimited,

    /// Page fetch failed for other reasons (other HTTP errors, unreadable body)
    Failed,

    /// Page Content-Type is not HTML
    ContentMismatch,
}

impl PageState {
    /// Returns true if this represents a successful fetch
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Fetched)
    }

    /// Returns true if the URL was never requested
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Filtered)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Self::DeadLink
                | Self::Unreachable
                | Self::RateLimited
                | Self::Failed
                | Self::ContentMismatch
        )
    }

    /// Short snake_case label used in logs and statistics
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fetched => "fetched",
            Self::Filtered => "filtered",
            Self::DeadLink => "dead_link",
            Self::Unreachable => "unreachable",
            Self::RateLimited => "rate_limited",
            Self::Failed => "failed",
            Self::ContentMismatch => "content_mismatch",
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Fetched,
            Self::Filtered,
            Self::DeadLink,
            Self::Unreachable,
            Self::RateLimited,
            Self::Failed,
            Self::ContentMismatch,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
