//! Crawl frontier shared by the fetch workers
//!
//! This module handles:
//! - FIFO queue of URLs to crawl (breadth-first order)
//! - The visited set, checked when work is dequeued
//! - The page ceiling, counting in-flight fetches against the limit
//! - Waking idle workers when new work arrives or the crawl drains

use std::collections::{HashSet, VecDeque};
use tokio::sync::{Mutex, Notify};
use url::Url;

/// A URL queued for fetching
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedUrl {
    /// The normalized URL to fetch
    pub url: Url,

    /// Link distance from the nearest seed
    pub depth: u32,
}

#[derive(Debug, Default)]
struct FrontierState {
    queue: VecDeque<QueuedUrl>,
    visited: HashSet<String>,
    in_flight: usize,
    fetched: usize,
}

/// Frontier manages the queue and the visited set for one crawl
///
/// The same URL may be queued several times when it is discovered via
/// multiple pages; duplicates are dropped when dequeued.
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    wakeup: Notify,
    max_depth: u32,
    max_pages: usize,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// # Arguments
    ///
    /// * `max_depth` - Deepest link distance that may be fetched
    /// * `max_pages` - Hard ceiling on successfully fetched pages
    pub fn new(max_depth: u32, max_pages: usize) -> Self {
        Self {
            state: Mutex::new(FrontierState::default()),
            wakeup: Notify::new(),
            max_depth,
            max_pages,
        }
    }

    /// Queues a URL unless it was already visited or is too deep
    ///
    /// Returns true if the URL was added.
    pub async fn push(&self, url: Url, depth: u32) -> bool {
        if depth > self.max_depth {
            return false;
        }

        {
            let mut state = self.state.lock().await;
            if state.visited.contains(url.as_str()) {
                return false;
            }
            state.queue.push_back(QueuedUrl { url, depth });
        }

        self.wakeup.notify_waiters();
        true
    }

    /// Returns true if the URL has already been handed to a worker
    pub async fn is_visited(&self, url: &Url) -> bool {
        self.state.lock().await.visited.contains(url.as_str())
    }

    /// Takes the next URL to process and marks it visited
    ///
    /// Waits while the queue is empty but other workers still have fetches in
    /// flight, since those may discover new links or free up page budget.
    ///
    /// # Returns
    ///
    /// * `Some(QueuedUrl)` - A URL reserved for this worker
    /// * `None` - The crawl is finished
    pub async fn next(&self) -> Option<QueuedUrl> {
        loop {
            let wakeup = self.wakeup.notified();
            tokio::pin!(wakeup);
            wakeup.as_mut().enable();

            {
                let mut state = self.state.lock().await;

                if state.fetched + state.in_flight < self.max_pages {
                    while let Some(item) = state.queue.pop_front() {
                        if item.depth > self.max_depth {
                            continue;
                        }
                        if !state.visited.insert(item.url.to_string()) {
                            tracing::trace!("Already visited {}", item.url);
                            continue;
                        }
                        state.in_flight += 1;
                        return Some(item);
                    }
                }

                if state.in_flight == 0 {
                    return None;
                }
            }

            wakeup.await;
        }
    }

    /// Releases the reservation taken by [`Frontier::next`]
    ///
    /// Returns true if a successful fetch was counted against the page limit,
    /// false if the page must be discarded.
    pub async fn complete(&self, fetched: bool) -> bool {
        let counted = {
            let mut state = self.state.lock().await;
            state.in_flight = state.in_flight.saturating_sub(1);
            if fetched && state.fetched < self.max_pages {
                state.fetched += 1;
                true
            } else {
                false
            }
        };

        self.wakeup.notify_waiters();
        counted
    }

    /// Number of pages counted against the limit so far
    pub async fn fetched(&self) -> usize {
        self.state.lock().await.fetched
    }

    /// Number of queued entries, duplicates included
    pub async fn len(&self) -> usize {
        self.state.lock().await.queue.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
