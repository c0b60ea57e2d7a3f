//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that coordinates:
//! - Seeding the frontier and locking the crawl domain
//! - Admission checks (static filter plus robots.txt)
//! - Fetching pages and following their links breadth-first
//! - Politeness delays between requests
//! - The optional wall-clock deadline of a run

use crate::config::{Config, CrawlerConfig};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchResult, FetchedPage, RetryPolicy};
use crate::crawler::frontier::Frontier;
use crate::crawler::links::extract_links;
use crate::robots::{fetch_robots, RobotsCache, RobotsPolicy};
use crate::state::PageState;
use crate::url::{check_admission, extract_domain, normalize_url, Rejection};
use crate::DocmapError;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use url::Url;

/// Longest pause a robots.txt `Crawl-delay` may impose between requests
const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Everything a finished crawl produced
#[derive(Debug, Clone, Default)]
pub struct CrawlReport {
    /// Successfully fetched HTML pages, in completion order
    pub pages: Vec<FetchedPage>,

    /// Number of URLs that ended in each state
    pub outcomes: BTreeMap<PageState, u64>,

    /// Links found on fetched pages, before any filtering
    pub links_discovered: u64,

    /// Wall-clock duration of the crawl
    pub elapsed: Duration,

    /// True if the run deadline cut the crawl short
    pub timed_out: bool,
}

impl CrawlReport {
    /// Number of URLs that ended in `state`
    pub fn count(&self, state: PageState) -> u64 {
        self.outcomes.get(&state).copied().unwrap_or(0)
    }
}

/// Main crawler structure
///
/// A `Crawler` holds the HTTP client and settings; robots.txt entries and the
/// visited set live in a per-call session, so repeated crawls start clean.
pub struct Crawler {
    client: Client,
    config: CrawlerConfig,
    retry: RetryPolicy,
    agent: String,
}

impl Crawler {
    /// Creates a new crawler
    ///
    /// # Arguments
    ///
    /// * `config` - The docmap configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Successfully created crawler
    /// * `Err(DocmapError)` - The HTTP client could not be built
    pub fn new(config: &Config) -> Result<Self, DocmapError> {
        let client = build_http_client(&config.user_agent, config.crawler.timeout())?;

        Ok(Self {
            client,
            config: config.crawler.clone(),
            retry: RetryPolicy::from_config(&config.crawler),
            agent: config.user_agent.crawler_name.clone(),
        })
    }

    /// Crawls breadth-first from the seed URLs
    ///
    /// The domain of the first valid seed becomes the only domain the crawl
    /// may visit. Seeds that fail to parse or point elsewhere are logged and
    /// skipped. Fetch failures never abort the crawl.
    pub async fn crawl(&self, seed_urls: &[String]) -> CrawlReport {
        let start = Instant::now();

        let seeds: Vec<Url> = seed_urls
            .iter()
            .filter_map(|seed| match normalize_url(seed) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!("Skipping invalid seed URL {}: {}", seed, e);
                    None
                }
            })
            .collect();

        let Some((first, domain)) = seeds
            .first()
            .and_then(|url| extract_domain(url).map(|domain| (url, domain)))
        else {
            tracing::warn!("No valid seed URLs, nothing to crawl");
            return CrawlReport {
                elapsed: start.elapsed(),
                ..CrawlReport::default()
            };
        };

        let session = CrawlSession::new(self, domain, first.scheme().to_string());

        for seed in &seeds {
            if extract_domain(seed).as_deref() != Some(session.domain.as_str()) {
                tracing::warn!(
                    "Seed URL {} is outside crawl domain {}, skipping",
                    seed,
                    session.domain
                );
                continue;
            }
            session.frontier.push(seed.clone(), 0).await;
        }

        tracing::info!(
            "Starting crawl of {} from {} seed URL(s)",
            session.domain,
            seeds.len()
        );
        tracing::info!(
            "Max depth: {}, max pages: {}, workers: {}",
            self.config.max_depth,
            self.config.max_pages,
            self.config.concurrency
        );

        let workers = stream::iter((0..self.config.concurrency).map(|id| session.worker(id)))
            .buffer_unordered(self.config.concurrency)
            .collect::<Vec<()>>();

        let timed_out = match self.config.run_timeout() {
            Some(limit) => tokio::time::timeout(limit, workers).await.is_err(),
            None => {
                workers.await;
                false
            }
        };

        if timed_out {
            tracing::warn!("Crawl deadline reached, keeping pages fetched so far");
        }

        let report = session.into_report(start.elapsed(), timed_out);
        tracing::info!(
            "Crawl completed: {} pages fetched in {:.2}s",
            report.pages.len(),
            report.elapsed.as_secs_f64()
        );
        report
    }
}

/// State of a single crawl invocation
struct CrawlSession<'a> {
    crawler: &'a Crawler,
    domain: String,
    scheme: String,
    frontier: Frontier,
    robots: RobotsCache,
    pages: Mutex<Vec<FetchedPage>>,
    outcomes: Mutex<BTreeMap<PageState, u64>>,
    links_discovered: AtomicU64,
}

impl<'a> CrawlSession<'a> {
    fn new(crawler: &'a Crawler, domain: String, scheme: String) -> Self {
        Self {
            crawler,
            domain,
            scheme,
            frontier: Frontier::new(crawler.config.max_depth, crawler.config.max_pages),
            robots: RobotsCache::new(),
            pages: Mutex::new(Vec::new()),
            outcomes: Mutex::new(BTreeMap::new()),
            links_discovered: AtomicU64::new(0),
        }
    }

    async fn worker(&self, id: usize) {
        while let Some(item) = self.frontier.next().await {
            if let Err(reason) = self.admit(&item.url).await {
                tracing::debug!("Skipping {}: {}", item.url, reason);
                self.record(PageState::Filtered).await;
                self.frontier.complete(false).await;
                continue;
            }

            tracing::info!("Crawling [depth {}] {}", item.depth, item.url);

            let page = match fetch_url(&self.crawler.client, item.url.as_str(), &self.crawler.retry)
                .await
            {
                FetchResult::Success(page) => self.accept_page(page, item.depth).await,
                FetchResult::ContentMismatch { content_type } => {
                    tracing::debug!(
                        "Skipping {}: not HTML (Content-Type: {})",
                        item.url,
                        content_type
                    );
                    self.record(PageState::ContentMismatch).await;
                    None
                }
                FetchResult::HttpError { status_code, state } => {
                    tracing::warn!("Failed to fetch {}: HTTP {}", item.url, status_code);
                    self.record(state).await;
                    None
                }
                FetchResult::NetworkError { error, state } => {
                    tracing::warn!("Failed to fetch {}: {}", item.url, error);
                    self.record(state).await;
                    None
                }
            };

            match page {
                Some(page) => {
                    if self.frontier.complete(true).await {
                        self.record(PageState::Fetched).await;
                        self.pages.lock().await.push(page);
                    } else {
                        tracing::debug!("Page limit reached, discarding {}", page.url);
                    }
                }
                None => {
                    self.frontier.complete(false).await;
                }
            }

            self.pause().await;
        }

        tracing::trace!("Worker {} finished", id);
    }

    /// Follows the links of a fetched page; None if the page must be dropped
    async fn accept_page(&self, page: FetchedPage, depth: u32) -> Option<FetchedPage> {
        let Ok(final_url) = Url::parse(&page.final_url) else {
            return Some(page);
        };

        if extract_domain(&final_url).as_deref() != Some(self.domain.as_str()) {
            tracing::debug!("{} redirected off-domain to {}", page.url, final_url);
            self.record(PageState::Filtered).await;
            return None;
        }

        if depth < self.crawler.config.max_depth {
            self.enqueue_links(&page, &final_url, depth + 1).await;
        }

        Some(page)
    }

    async fn enqueue_links(&self, page: &FetchedPage, base: &Url, depth: u32) {
        let links = extract_links(&page.html, base);
        self.links_discovered
            .fetch_add(links.len() as u64, Ordering::Relaxed);

        let mut added = 0;
        for link in links {
            let Ok(link) = normalize_url(link.as_str()) else {
                continue;
            };
            if self.frontier.is_visited(&link).await {
                continue;
            }
            if let Err(reason) = self.admit(&link).await {
                tracing::trace!("Not following {}: {}", link, reason);
                continue;
            }
            if self.frontier.push(link, depth).await {
                added += 1;
            }
        }

        tracing::debug!("Queued {} links from {}", added, page.url);
    }

    /// Static admission filter followed by robots.txt
    async fn admit(&self, url: &Url) -> Result<(), Rejection> {
        check_admission(url, &self.domain)?;

        if let Some(policy) = self.robots_policy().await {
            if !policy.is_allowed(url.as_str(), &self.crawler.agent) {
                return Err(Rejection::Robots);
            }
        }

        Ok(())
    }

    async fn robots_policy(&self) -> Option<Arc<RobotsPolicy>> {
        if !self.crawler.config.respect_robots {
            return None;
        }

        let policy = self
            .robots
            .get_or_fetch(&self.domain, || {
                fetch_robots(&self.crawler.client, &self.scheme, &self.domain)
            })
            .await;
        Some(policy)
    }

    /// Waits the configured delay, or longer if robots.txt asks for it
    async fn pause(&self) {
        let mut delay = self.crawler.config.delay();

        if let Some(policy) = self.robots_policy().await {
            if let Some(requested) = policy
                .crawl_delay(&self.crawler.agent)
                .and_then(robots_delay)
            {
                delay = delay.max(requested);
            }
        }

        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
    }

    async fn record(&self, state: PageState) {
        *self.outcomes.lock().await.entry(state).or_insert(0) += 1;
    }

    fn into_report(self, elapsed: Duration, timed_out: bool) -> CrawlReport {
        CrawlReport {
            pages: self.pages.into_inner(),
            outcomes: self.outcomes.into_inner(),
            links_discovered: self.links_discovered.into_inner(),
            elapsed,
            timed_out,
        }
    }
}

/// Crawls a documentation site with default settings
///
/// # Arguments
///
/// * `seed_urls` - Starting URLs; the first one fixes the crawl domain
/// * `max_depth` - Deepest link distance from a seed to fetch
/// * `max_pages` - Maximum number of pages to return
/// * `delay` - Pause after every request
///
/// # Returns
///
/// * `Ok(Vec<FetchedPage>)` - Pages fetched, possibly empty
/// * `Err(DocmapError)` - The HTTP client could not be built
pub async fn crawl(
    seed_urls: &[String],
    max_depth: u32,
    max_pages: usize,
    delay: Duration,
) -> Result<Vec<FetchedPage>, DocmapError> {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.max_pages = max_pages;
    config.crawler.delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);

    let crawler = Crawler::new(&config)?;
    Ok(crawler.crawl(seed_urls).await.pages)
}

/// Converts a robots.txt `Crawl-delay` to a wait, capped at [`MAX_CRAWL_DELAY`]
///
/// Negative, NaN and zero delays yield None.
fn robots_delay(secs: f64) -> Option<Duration> {
    if secs.is_nan() || secs <= 0.0 {
        return None;
    }
    let delay = Duration::try_from_secs_f64(secs).unwrap_or(MAX_CRAWL_DELAY);
    Some(delay.min(MAX_CRAWL_DELAY))
}
