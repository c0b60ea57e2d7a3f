//! Robots.txt handling module
//!
//! This module provides functionality for fetching, parsing, and caching robots.txt files.
//! Fetch failures are fail-open: the domain is treated as allowing everything.

mod cache;
mod parser;

pub use cache::{RobotsCache, RobotsPolicy};
pub use parser::ParsedRobots;

use reqwest::Client;

/// Fetches robots.txt for a domain
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `scheme` - Scheme of the crawl (`http` or `https`)
/// * `domain` - The domain (host plus optional port)
///
/// # Returns
///
/// * `Some(ParsedRobots)` - robots.txt was retrieved
/// * `None` - network error or non-success status
pub async fn fetch_robots(client: &Client, scheme: &str, domain: &str) -> Option<ParsedRobots> {
    let robots_url = format!("{}://{}/robots.txt", scheme, domain);
    tracing::debug!("Fetching {}", robots_url);

    let response = match client.get(&robots_url).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("Could not fetch robots.txt for {}: {}", domain, e);
            return None;
        }
    };

    if !response.status().is_success() {
        tracing::debug!(
            "robots.txt for {} returned HTTP {}",
            domain,
            response.status().as_u16()
        );
        return None;
    }

    match response.text().await {
        Ok(body) => Some(ParsedRobots::from_content(&body)),
        Err(e) => {
            tracing::debug!("Could not read robots.txt for {}: {}", domain, e);
            None
        }
    }
}
