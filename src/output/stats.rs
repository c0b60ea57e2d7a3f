//! Run statistics
//!
//! Collected by the pipeline and printed by the CLI after a run.

use crate::state::PageState;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::time::Duration;

/// Statistics of one extraction run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunStats {
    /// Pages fetched successfully
    pub pages_crawled: usize,

    /// Pages that parsed successfully
    pub pages_parsed: usize,

    /// Modules in the final output
    pub modules_found: usize,

    /// Submodules in the final output
    pub submodules_found: usize,

    /// Links found on fetched pages, before filtering
    pub links_discovered: u64,

    /// Count of attempted URLs by final state
    pub outcomes: BTreeMap<PageState, u64>,

    /// Wall-clock duration of the crawl
    pub crawl_time: Duration,

    /// True if the run deadline cut the crawl short
    pub timed_out: bool,
}

impl RunStats {
    /// URLs that reached a final state
    pub fn attempted(&self) -> u64 {
        self.outcomes.values().sum()
    }

    /// Number of URLs that ended in `state`
    pub fn count(&self, state: PageState) -> u64 {
        self.outcomes.get(&state).copied().unwrap_or(0)
    }

    /// URLs that were fetched as HTML
    pub fn succeeded(&self) -> u64 {
        self.sum_where(PageState::is_success)
    }

    /// URLs refused before any request was made
    pub fn skipped(&self) -> u64 {
        self.sum_where(PageState::is_skipped)
    }

    /// URLs that were requested but yielded no page
    pub fn failed(&self) -> u64 {
        self.sum_where(PageState::is_error)
    }

    fn sum_where(&self, predicate: fn(&PageState) -> bool) -> u64 {
        self.outcomes
            .iter()
            .filter(|(state, _)| predicate(state))
            .map(|(_, count)| count)
            .sum()
    }
}

/// Renders statistics as a human-readable report
pub fn format_statistics(stats: &RunStats) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Extraction Statistics ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Pages crawled: {}", stats.pages_crawled);
    let _ = writeln!(out, "  Pages parsed: {}", stats.pages_parsed);
    let _ = writeln!(out, "  Modules found: {}", stats.modules_found);
    let _ = writeln!(out, "  Submodules found: {}", stats.submodules_found);
    let _ = writeln!(out, "  Links found: {}", stats.links_discovered);
    let _ = writeln!(out, "  Crawl time: {:.2}s", stats.crawl_time.as_secs_f64());
    if stats.timed_out {
        let _ = writeln!(out, "  Crawl stopped at the run deadline");
    }
    let _ = writeln!(out);

    let attempted = stats.attempted();
    if attempted > 0 {
        let _ = writeln!(out, "URLs by State:");
        // Sort states by count (descending)
        let mut state_counts: Vec<_> = stats.outcomes.iter().collect();
        state_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (state, count) in state_counts {
            let percentage = (*count as f64 / attempted as f64) * 100.0;
            let _ = writeln!(out, "  {}: {} ({:.1}%)", state, count, percentage);
        }
        let _ = writeln!(
            out,
            "  ({} skipped, {} failed)",
            stats.skipped(),
            stats.failed()
        );
        let _ = writeln!(out);
    }

    let fetched = stats.succeeded();
    let success_rate = if attempted > 0 {
        (fetched as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };
    let _ = write!(
        out,
        "Success Rate: {:.1}% ({} / {} URLs fetched)",
        success_rate, fetched, attempted
    );

    out
}

/// Prints statistics to stdout
pub fn print_statistics(stats: &RunStats) {
    println!("{}", format_statistics(stats));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempted_and_count() {
        let mut stats = RunStats::default();
        stats.outcomes.insert(PageState::Fetched, 8);
        stats.outcomes.insert(PageState::DeadLink, 2);

        assert_eq!(stats.attempted(), 10);
        assert_eq!(stats.count(PageState::Fetched), 8);
        assert_eq!(stats.count(PageState::Filtered), 0);
    }

    #[test]
    fn test_state_categories() {
        let mut stats = RunStats::default();
        stats.outcomes.insert(PageState::Fetched, 5);
        stats.outcomes.insert(PageState::Filtered, 4);
        stats.outcomes.insert(PageState::DeadLink, 2);
        stats.outcomes.insert(PageState::ContentMismatch, 1);

        assert_eq!(stats.succeeded(), 5);
        assert_eq!(stats.skipped(), 4);
        assert_eq!(stats.failed(), 3);
    }

    #[test]
    fn test_format_statistics() {
        let mut stats = RunStats {
            pages_crawled: 8,
            pages_parsed: 7,
            modules_found: 3,
            ..RunStats::default()
        };
        stats.outcomes.insert(PageState::Fetched, 8);
        stats.outcomes.insert(PageState::DeadLink, 2);

        let report = format_statistics(&stats);
        assert!(report.contains("Pages parsed: 7"));
        assert!(report.contains("dead_link: 2 (20.0%)"));
        assert!(report.contains("(0 skipped, 2 failed)"));
        assert!(report.ends_with("Success Rate: 80.0% (8 / 10 URLs fetched)"));
    }

    #[test]
    fn test_format_empty_statistics() {
        let report = format_statistics(&RunStats::default());
        assert!(!report.contains("URLs by State"));
        assert!(report.contains("Success Rate: 0.0%"));
    }
}
