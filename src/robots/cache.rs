//! Per-crawl robots.txt cache
//!
//! Each crawl owns one cache, so sequential or concurrent crawls of different
//! sites never observe each other's entries. An entry is populated at most once:
//! concurrent first accesses for the same domain wait on the same cell instead
//! of issuing duplicate `robots.txt` requests. A failed fetch is cached as
//! "unavailable" and treated as allow-all for the rest of the crawl.

use crate::robots::ParsedRobots;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell};

/// Robots policy for one domain
#[derive(Debug, Clone)]
pub struct RobotsPolicy {
    /// Domain the policy was fetched for
    pub domain: String,

    /// Parsed directives, or `None` when robots.txt could not be fetched
    rules: Option<ParsedRobots>,
}

impl RobotsPolicy {
    pub fn new(domain: &str, rules: Option<ParsedRobots>) -> Self {
        Self {
            domain: domain.to_string(),
            rules,
        }
    }

    /// Returns true if directives were retrieved for this domain
    pub fn is_available(&self) -> bool {
        self.rules.is_some()
    }

    /// Checks a URL against the directives; unavailable policies allow everything
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        self.rules
            .as_ref()
            .map_or(true, |rules| rules.is_allowed(url, user_agent))
    }

    /// Crawl delay in seconds requested for the given agent
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        self.rules
            .as_ref()
            .and_then(|rules| rules.crawl_delay(user_agent))
    }
}

/// Cache of robots policies keyed by domain
#[derive(Debug, Default)]
pub struct RobotsCache {
    entries: Mutex<HashMap<String, Arc<OnceCell<Arc<RobotsPolicy>>>>>,
}

impl RobotsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached policy for `domain`, running `fetch` on first access
    pub async fn get_or_fetch<F, Fut>(&self, domain: &str, fetch: F) -> Arc<RobotsPolicy>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Option<ParsedRobots>>,
    {
        let cell = {
            let mut entries = self.entries.lock().await;
            entries.entry(domain.to_string()).or_default().clone()
        };

        cell.get_or_init(|| async move {
            let rules = fetch().await;
            if rules.is_none() {
                tracing::debug!("robots.txt unavailable for {}, allowing all", domain);
            }
            Arc::new(RobotsPolicy::new(domain, rules))
        })
        .await
        .clone()
    }

    /// Number of domains with a populated or in-flight entry
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
