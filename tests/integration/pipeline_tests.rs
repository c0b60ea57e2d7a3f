//! End-to-end extraction tests
//!
//! A documentation site is served by wiremock and run through the whole
//! pipeline: crawl, parse, infer, summarize and filter.

use docmap::config::Config;
use docmap::output::write_json;
use docmap::pipeline::LogLevel;
use docmap::{to_json, Pipeline};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn create_test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.crawler.max_pages = 20;
    config.crawler.delay_ms = 0;
    config.crawler.backoff_base_ms = 1;
    config.crawler.timeout_secs = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

async fn mount_html(server: &MockServer, route: &str, html: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html.to_string(), "text/html"))
        .mount(server)
        .await;
}

const BILLING_PAGE: &str = r#"<html>
<head><title>Billing</title></head>
<body>
  <nav><a href="/">Home</a> <a href="/login">Log in</a></nav>
  <main>
    <h1>Billing</h1>
    <p>The billing service manages subscriptions and payment methods for every account.</p>
    <h2>Invoices</h2>
    <p>Invoices are generated at the end of each billing cycle and sent by email.</p>
    <h2>Refunds</h2>
    <p>The refunds endpoint handles partial and full refunds of captured payments.</p>
  </main>
  <footer>Copyright Example Corp</footer>
</body>
</html>"#;

#[tokio::test]
async fn test_h1_modules_with_submodules() {
    let server = MockServer::start().await;
    mount_html(&server, "/", BILLING_PAGE).await;

    let pipeline = Pipeline::new(create_test_config(1));
    let result = pipeline.extract(&[format!("{}/", server.uri())]).await;

    assert_eq!(result.modules.len(), 1);
    let billing = &result.modules[0];
    assert_eq!(billing.module, "Billing");
    assert!(!billing.description.is_empty());

    let names: Vec<&str> = billing.submodules.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Invoices", "Refunds"]);
    for (_, description) in &billing.submodules {
        assert!(!description.is_empty());
    }

    assert_eq!(result.stats.pages_crawled, 1);
    assert_eq!(result.stats.modules_found, 1);
    assert_eq!(result.stats.submodules_found, 2);
}

#[tokio::test]
async fn test_login_link_not_fetched() {
    let server = MockServer::start().await;
    mount_html(&server, "/", BILLING_PAGE).await;

    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<form></form>", "text/html"))
        .expect(0)
        .mount(&server)
        .await;

    let pipeline = Pipeline::new(create_test_config(2));
    let result = pipeline.extract(&[format!("{}/", server.uri())]).await;

    assert_eq!(result.stats.pages_crawled, 1);
}

#[tokio::test]
async fn test_h2_fallback_without_h1() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        r#"<html><body>
            <a href="/guide">Guide</a>
            <h2>Authentication</h2>
            <p>Every request supports bearer tokens issued by the identity provider.</p>
            <h3>API Keys</h3>
            <p>API keys are created per project and can be rotated at any time.</p>
            <h2>Webhooks</h2>
            <p>Webhooks deliver event notifications to a configured endpoint over HTTPS.</p>
        </body></html>"#,
    )
    .await;
    mount_html(
        &server,
        "/guide",
        r#"<html><body>
            <h2>Authentication</h2>
            <p>The guide explains how the platform handles token refresh for clients.</p>
        </body></html>"#,
    )
    .await;

    let pipeline = Pipeline::new(create_test_config(1));
    let result = pipeline.extract(&[format!("{}/", server.uri())]).await;

    let names: Vec<&str> = result.modules.iter().map(|m| m.module.as_str()).collect();
    assert_eq!(names, vec!["Authentication", "Webhooks"]);

    let auth = &result.modules[0];
    assert_eq!(auth.submodules.len(), 1);
    assert_eq!(auth.submodules[0].0, "API Keys");
}

#[tokio::test]
async fn test_module_without_usable_description_is_dropped() {
    let server = MockServer::start().await;

    mount_html(
        &server,
        "/",
        r#"<html><body>
            <a href="/status">Status</a>
            <h1>Billing</h1>
            <p>The billing service manages subscriptions and payment methods for every account.</p>
        </body></html>"#,
    )
    .await;
    mount_html(
        &server,
        "/status",
        "<html><body><h1>Status</h1><p>All good.</p></body></html>",
    )
    .await;

    let pipeline = Pipeline::new(create_test_config(1));
    let result = pipeline.extract(&[format!("{}/", server.uri())]).await;

    assert_eq!(result.stats.pages_crawled, 2);
    let names: Vec<&str> = result.modules.iter().map(|m| m.module.as_str()).collect();
    assert_eq!(names, vec!["Billing"]);
}

#[tokio::test]
async fn test_json_output_shape() {
    let server = MockServer::start().await;
    mount_html(&server, "/", BILLING_PAGE).await;

    let pipeline = Pipeline::new(create_test_config(0));
    let result = pipeline.extract(&[format!("{}/", server.uri())]).await;

    let json = to_json(&result.modules, false).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();

    let records = value.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["module"], "Billing");
    assert!(records[0]["Description"].as_str().unwrap().len() >= 20);

    let submodules = records[0]["Submodules"].as_object().unwrap();
    assert!(submodules.contains_key("Invoices"));
    assert!(submodules.contains_key("Refunds"));

    // Submodules keep their discovery order in the document
    let invoices = json.find("\"Invoices\"").unwrap();
    let refunds = json.find("\"Refunds\"").unwrap();
    assert!(invoices < refunds);

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("modules.json");
    write_json(&result.modules, &out, true).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(written, value);
}

#[tokio::test]
async fn test_unreachable_site_yields_empty_result() {
    let mut config = create_test_config(1);
    config.crawler.max_retries = 0;
    let pipeline = Pipeline::new(config);

    let result = pipeline.extract(&["http://127.0.0.1:9/".to_string()]).await;

    assert!(result.modules.is_empty());
    assert_eq!(result.stats.pages_crawled, 0);
    assert!(result.logs.at_least(LogLevel::Warning).count() >= 1);
    assert_eq!(to_json(&result.modules, false).unwrap(), "[]");
}

#[tokio::test]
async fn test_run_log_records_steps() {
    let server = MockServer::start().await;
    mount_html(&server, "/", BILLING_PAGE).await;

    let pipeline = Pipeline::new(create_test_config(0));
    let result = pipeline.extract(&[format!("{}/", server.uri())]).await;

    let messages: Vec<&str> = result
        .logs
        .entries()
        .iter()
        .map(|entry| entry.message.as_str())
        .collect();
    assert!(messages.iter().any(|m| m.starts_with("Step 1")));
    assert!(messages.iter().any(|m| m.starts_with("Step 5")));
    assert!(messages
        .iter()
        .any(|m| *m == "Extraction complete. Generated 1 modules"));
}
