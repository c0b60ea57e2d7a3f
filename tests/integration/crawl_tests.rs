//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end.

use docmap::config::Config;
use docmap::{Crawler, PageState};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration that does not wait between requests
fn create_test_config(max_depth: u32, max_pages: usize) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.max_pages = max_pages;
    config.crawler.delay_ms = 0;
    config.crawler.backoff_base_ms = 1;
    config.crawler.timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

fn seed(server: &MockServer) -> Vec<String> {
    vec![format!("{}/", server.uri())]
}

fn fetched_paths(report: &docmap::crawler::CrawlReport) -> Vec<String> {
    let mut paths: Vec<String> = report
        .pages
        .iter()
        .map(|page| url::Url::parse(&page.url).unwrap().path().to_string())
        .collect();
    paths.sort();
    paths
}

#[tokio::test]
async fn test_full_crawl_single_domain() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/page1">Page 1</a> <a href="page2">Page 2</a>"#,
    )
    .await;
    mount_page(&mock_server, "/page1", "<p>First page</p>").await;
    mount_page(&mock_server, "/page2", "<p>Second page</p>").await;

    let crawler = Crawler::new(&create_test_config(2, 10)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(fetched_paths(&report), vec!["/", "/page1", "/page2"]);
    assert_eq!(report.count(PageState::Fetched), 3);
    assert_eq!(report.links_discovered, 2);
    assert!(!report.timed_out);
}

#[tokio::test]
async fn test_depth_limit() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/level1">Level 1</a>"#).await;
    mount_page(&mock_server, "/level1", r#"<a href="/level2">Level 2</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/level2"))
        .respond_with(html_page("<p>Too deep</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&create_test_config(1, 10)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(fetched_paths(&report), vec!["/", "/level1"]);
}

#[tokio::test]
async fn test_depth_zero_fetches_seeds_only() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/next">Next</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("<p>Never reached</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&create_test_config(0, 10)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(report.pages.len(), 1);
}

#[tokio::test]
async fn test_page_limit() {
    let mock_server = MockServer::start().await;

    let links: String = (1..=6)
        .map(|i| format!(r#"<a href="/p{}">Page {}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 1..=6 {
        mount_page(&mock_server, &format!("/p{}", i), "<p>Leaf</p>").await;
    }

    let crawler = Crawler::new(&create_test_config(3, 3)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(report.pages.len(), 3);
    assert_eq!(report.pages[0].url, format!("{}/", mock_server.uri()));
}

#[tokio::test]
async fn test_page_limit_with_workers() {
    let mock_server = MockServer::start().await;

    let links: String = (1..=10)
        .map(|i| format!(r#"<a href="/p{}">Page {}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 1..=10 {
        mount_page(&mock_server, &format!("/p{}", i), "<p>Leaf</p>").await;
    }

    let mut config = create_test_config(3, 4);
    config.crawler.concurrency = 4;
    let crawler = Crawler::new(&config).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(report.pages.len(), 4);
}

#[tokio::test]
async fn test_equivalent_urls_fetched_once() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/guide">Guide</a>
           <a href="/guide/">Guide again</a>
           <a href="/guide#install">Install</a>
           <a href="/guide?utm_source=nav">Tracked</a>"#,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/guide"))
        .respond_with(html_page(r#"<a href="/">Home</a>"#))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&create_test_config(3, 10)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(fetched_paths(&report), vec!["/", "/guide"]);

    let mut urls: Vec<&str> = report.pages.iter().map(|p| p.url.as_str()).collect();
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), report.pages.len());
}

#[tokio::test]
async fn test_stays_on_seed_domain() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="http://other.invalid/docs">Elsewhere</a> <a href="/local">Local</a>"#,
    )
    .await;
    mount_page(&mock_server, "/local", "<p>Local page</p>").await;

    let crawler = Crawler::new(&create_test_config(2, 10)).unwrap();
    let seeds = vec![
        format!("{}/", mock_server.uri()),
        "http://second.invalid/".to_string(),
    ];
    let report = crawler.crawl(&seeds).await;

    assert_eq!(report.pages.len(), 2);
    for page in &report.pages {
        assert!(page.url.starts_with(&mock_server.uri()));
    }
}

#[tokio::test]
async fn test_account_pages_never_fetched() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/login">Log in</a> <a href="/docs/billing">Billing</a>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/billing", "<p>Billing docs</p>").await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(html_page("<form></form>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&create_test_config(2, 10)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(fetched_paths(&report), vec!["/", "/docs/billing"]);
}

#[tokio::test]
async fn test_robots_txt_respected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/public">Public</a> <a href="/private/notes">Private</a>"#,
    )
    .await;
    mount_page(&mock_server, "/public", "<p>Public page</p>").await;

    Mock::given(method("GET"))
        .and(path("/private/notes"))
        .respond_with(html_page("<p>Secret</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&create_test_config(2, 10)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(fetched_paths(&report), vec!["/", "/public"]);
}

#[tokio::test]
async fn test_robots_txt_ignored_when_disabled() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .expect(0)
        .mount(&mock_server)
        .await;

    mount_page(&mock_server, "/", "<p>Home</p>").await;

    let mut config = create_test_config(1, 10);
    config.crawler.respect_robots = false;
    let crawler = Crawler::new(&config).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(report.pages.len(), 1);
}

#[tokio::test]
async fn test_seed_disallowed_by_robots_is_filtered() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: TestBot\nDisallow: /\n"))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html_page("<p>Home</p>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&create_test_config(1, 10)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert!(report.pages.is_empty());
    assert_eq!(report.count(PageState::Filtered), 1);
}

#[tokio::test]
async fn test_non_html_skipped() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/api/schema">API</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/api/schema"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"openapi":"3.0"}"#, "application/json"))
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&create_test_config(2, 10)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(fetched_paths(&report), vec!["/"]);
    assert_eq!(report.count(PageState::ContentMismatch), 1);
}

#[tokio::test]
async fn test_transient_error_retried() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/flaky">Flaky</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/flaky"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/flaky", "<p>Recovered</p>").await;

    let crawler = Crawler::new(&create_test_config(2, 10)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(fetched_paths(&report), vec!["/", "/flaky"]);
    assert_eq!(report.count(PageState::Failed), 0);
}

#[tokio::test]
async fn test_persistent_server_error_gives_up() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/broken">Broken</a>"#).await;

    let mut config = create_test_config(2, 10);
    config.crawler.max_retries = 2;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(3)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&config).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.count(PageState::Failed), 1);
}

#[tokio::test]
async fn test_dead_link_recorded() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/missing">Missing</a>"#).await;

    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let crawler = Crawler::new(&create_test_config(2, 10)).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.count(PageState::DeadLink), 1);
}

#[tokio::test]
async fn test_unreachable_seed_yields_empty_report() {
    let mut config = create_test_config(1, 10);
    config.crawler.max_retries = 0;
    let crawler = Crawler::new(&config).unwrap();

    let report = crawler.crawl(&["http://127.0.0.1:9/".to_string()]).await;

    assert!(report.pages.is_empty());
    assert_eq!(report.count(PageState::Fetched), 0);
}

#[tokio::test]
async fn test_crawl_function() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/intro">Intro</a>"#).await;
    mount_page(&mock_server, "/intro", "<p>Introduction</p>").await;

    let pages = docmap::crawl(&seed(&mock_server), 1, 10, std::time::Duration::ZERO)
        .await
        .unwrap();

    assert_eq!(pages.len(), 2);
    assert!(pages[1].final_url.ends_with("/intro"));
    assert!(pages.iter().all(|page| page.status_code == 200));
}

#[tokio::test]
async fn test_run_deadline_keeps_partial_results() {
    let mock_server = MockServer::start().await;

    mount_page(&mock_server, "/", r#"<a href="/slow">Slow</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("<p>Slow page</p>").set_delay(std::time::Duration::from_secs(4)))
        .mount(&mock_server)
        .await;

    let mut config = create_test_config(2, 10);
    config.crawler.run_timeout_secs = Some(1);
    let crawler = Crawler::new(&config).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    assert!(report.timed_out);
    assert_eq!(fetched_paths(&report), vec!["/"]);
}

#[tokio::test]
async fn test_oversized_crawl_delay_does_not_abort_crawl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nCrawl-delay: 1e20\n"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", r#"<a href="/next">Next</a>"#).await;
    mount_page(&mock_server, "/next", "<p>Next page</p>").await;

    let mut config = create_test_config(2, 10);
    config.crawler.run_timeout_secs = Some(2);
    let crawler = Crawler::new(&config).unwrap();
    let report = crawler.crawl(&seed(&mock_server)).await;

    // The capped delay still outlasts the deadline, so only the seed is fetched
    assert_eq!(fetched_paths(&report), vec!["/"]);
    assert!(report.timed_out);
}
