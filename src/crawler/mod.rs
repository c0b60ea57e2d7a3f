//! Crawler module for web page fetching and link following
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with retry logic
//! - Link extraction from fetched pages
//! - The breadth-first frontier shared by fetch workers
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod links;

pub use coordinator::{crawl, CrawlReport, Crawler};
pub use fetcher::{build_http_client, fetch_url, FetchResult, FetchedPage, RetryPolicy};
pub use frontier::{Frontier, QueuedUrl};
pub use links::extract_links;
