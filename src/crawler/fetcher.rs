//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page content
//! - Retry with exponential backoff for transient failures
//! - Error classification into page states

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::state::PageState;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::time::Duration;

/// Status codes worth retrying
const RETRY_STATUSES: &[u16] = &[429, 500, 502, 503, 504];

/// Upper bound on the connection phase of a request
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// A successfully retrieved HTML page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// Normalized URL the page was requested under
    pub url: String,

    /// URL after redirects; relative links resolve against it
    pub final_url: String,

    /// Page body content
    pub html: String,

    /// HTTP status code
    pub status_code: u16,

    /// Content-Type header value (lowercase)
    pub content_type: String,
}

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched an HTML page
    Success(FetchedPage),

    /// Page is not HTML (Content-Type mismatch)
    ContentMismatch {
        /// The actual Content-Type received
        content_type: String,
    },

    /// HTTP error that maps to a specific page state
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// The page state this error maps to
        state: PageState,
    },

    /// Network error (connection refused, timeout, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// The page state this error maps to
        state: PageState,
    },
}

impl FetchResult {
    /// Page state this result maps to
    pub fn state(&self) -> PageState {
        match self {
            Self::Success(_) => PageState::Fetched,
            Self::ContentMismatch { .. } => PageState::ContentMismatch,
            Self::HttpError { state, .. } | Self::NetworkError { state, .. } => *state,
        }
    }
}

/// Bounded retry policy for transient failures
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,

    /// Wait before the first retry; doubled for each further retry
    pub backoff_base: Duration,
}

impl RetryPolicy {
    pub fn from_config(config: &CrawlerConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            backoff_base: Duration::from_millis(config.backoff_base_ms),
        }
    }

    /// Wait before retry number `retry` (1-based)
    pub fn backoff(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.backoff_base.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&CrawlerConfig::default())
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total timeout of a single request
///
/// # Example
///
/// ```no_run
/// use docmap::config::UserAgentConfig;
/// use docmap::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent())
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Outcome of a single attempt
enum Attempt {
    Done(FetchResult),
    Retryable(FetchResult),
}

/// Fetches a URL with retry logic
///
/// # Retry Logic
///
/// | Condition | Action |
/// |-----------|--------|
/// | HTTP 429, 500, 502, 503, 504 | Retry with backoff, then RateLimited / Failed |
/// | Timeout, connection error | Retry with backoff, then Unreachable |
/// | HTTP 404, 410 | Immediate → DeadLink |
/// | Other non-2xx | Immediate → Failed |
/// | Non-HTML Content-Type | Immediate → ContentMismatch |
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - The URL to fetch
/// * `retry` - How often and how patiently to retry
pub async fn fetch_url(client: &Client, url: &str, retry: &RetryPolicy) -> FetchResult {
    let mut retries = 0;

    loop {
        match fetch_once(client, url).await {
            Attempt::Retryable(result) if retries < retry.max_retries => {
                retries += 1;
                let wait = retry.backoff(retries);
                tracing::debug!(
                    "Transient failure for {} ({}), retry {}/{} in {:?}",
                    url,
                    result.state(),
                    retries,
                    retry.max_retries,
                    wait
                );
                tokio::time::sleep(wait).await;
            }
            Attempt::Retryable(result) | Attempt::Done(result) => return result,
        }
    }
}

async fn fetch_once(client: &Client, url: &str) -> Attempt {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_network_error(&e),
    };

    let status = response.status();

    if RETRY_STATUSES.contains(&status.as_u16()) {
        let state = if status == StatusCode::TOO_MANY_REQUESTS {
            PageState::RateLimited
        } else {
            PageState::Failed
        };
        return Attempt::Retryable(FetchResult::HttpError {
            status_code: status.as_u16(),
            state,
        });
    }

    if status == StatusCode::NOT_FOUND || status == StatusCode::GONE {
        return Attempt::Done(FetchResult::HttpError {
            status_code: status.as_u16(),
            state: PageState::DeadLink,
        });
    }

    if !status.is_success() {
        return Attempt::Done(FetchResult::HttpError {
            status_code: status.as_u16(),
            state: PageState::Failed,
        });
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_lowercase();

    if !is_html(&content_type) {
        return Attempt::Done(FetchResult::ContentMismatch { content_type });
    }

    let final_url = response.url().to_string();

    match response.text().await {
        Ok(html) => Attempt::Done(FetchResult::Success(FetchedPage {
            url: url.to_string(),
            final_url,
            html,
            status_code: status.as_u16(),
            content_type,
        })),
        Err(e) => Attempt::Done(FetchResult::NetworkError {
            error: e.to_string(),
            state: PageState::Failed,
        }),
    }
}

fn classify_network_error(e: &reqwest::Error) -> Attempt {
    if e.is_timeout() {
        Attempt::Retryable(FetchResult::NetworkError {
            error: "Request timeout".to_string(),
            state: PageState::Unreachable,
        })
    } else if e.is_connect() {
        Attempt::Retryable(FetchResult::NetworkError {
            error: format!("Connection failed: {}", e),
            state: PageState::Unreachable,
        })
    } else {
        Attempt::Done(FetchResult::NetworkError {
            error: e.to_string(),
            state: PageState::Failed,
        })
    }
}

fn is_html(content_type: &str) -> bool {
    content_type.contains("text/html") || content_type.contains("application/xhtml+xml")
}
