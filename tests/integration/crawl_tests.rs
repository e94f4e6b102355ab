//! Integration tests for the crawl and harvest stages
//!
//! These tests use wiremock to create mock HTTP servers and run the real
//! HTTP fetch tier end-to-end.

use docweave::config::Config;
use docweave::corpus::harvest_site;
use docweave::crawler::{
    crawl_site, crawl_with, EscalationController, FetchStrategy, StandardPorts,
};
use docweave::output::{read_manifest, read_sitemap, MANIFEST_FILE, SITEMAP_FILE};
use docweave::WeaveError;
use std::time::Duration;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a fast test configuration
fn create_test_config(threshold: usize, http_attempts: u32) -> Config {
    let mut config = Config::default();
    config.crawler.request_delay = 0; // No politeness delay in tests
    config.crawler.fetch_timeout = 5;
    config.crawler.coverage_threshold = threshold;
    config.crawler.http_attempts = http_attempts;
    config.user_agent.crawler_name = "TestBot".to_string();
    config.browser.binary = Some("/nonexistent/docweave-test-browser".to_string());
    config.browser.auto_install = false;
    config
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .insert_header("content-type", "text/html"),
        )
        .mount(server)
        .await;
}

/// Home → page1, page2, broken, external; page1 → page2, home
async fn mount_small_site(server: &MockServer) {
    let base_url = server.uri();

    mount_page(
        server,
        "/",
        format!(
            r#"<html><body><main>
            <a href="{}/page1">Page 1</a>
            <a href="/page2#section">Page 2</a>
            <a href="/broken">Broken</a>
            <a href="http://external.invalid/">External</a>
            </main></body></html>"#,
            base_url
        ),
    )
    .await;
    mount_page(
        server,
        "/page1",
        r#"<html><body><main><h1>Page one</h1><a href="/page2/">Again</a><a href="/">Home</a></main></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        server,
        "/page2",
        "<html><body><article>Page two</article></body></html>".to_string(),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(404))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_writes_manifest_and_sitemap() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;
    let base_url = server.uri();

    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("site");
    let config = create_test_config(3, 1);

    let outcome = crawl_site(&config, &base_url, &folder).await.unwrap();

    assert_eq!(outcome.strategy, FetchStrategy::Http);
    assert_eq!(outcome.attempts.len(), 1);
    assert_eq!(outcome.result.failed(), &[format!("{}/broken", base_url)]);

    let expected = vec![
        base_url.clone(),
        format!("{}/page1", base_url),
        format!("{}/page2", base_url),
    ];
    assert_eq!(read_manifest(&folder.join(MANIFEST_FILE)).unwrap(), expected);
    assert_eq!(read_sitemap(&folder.join(SITEMAP_FILE)).unwrap(), expected);
}

#[tokio::test]
async fn test_pages_fetched_once_each() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<a href="/a">A</a><a href="/a/">A slash</a><a href="/a#top">A top</a>"#,
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"<a href="/">Home</a>"#))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let outcome = crawl_site(&create_test_config(2, 1), &base_url, dir.path())
        .await
        .unwrap();

    assert_eq!(outcome.result.len(), 2);
    // MockServer verifies the expect(1) counts on drop
}

#[tokio::test]
async fn test_retry_absorbs_transient_failure() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    // First request for the home page fails, later ones succeed
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let outcome = crawl_site(&create_test_config(3, 2), &base_url, dir.path())
        .await
        .unwrap();

    assert_eq!(outcome.attempts.len(), 2);
    assert_eq!(outcome.attempts[0].found, 0);
    assert!(!outcome.attempts[0].met_threshold);
    assert_eq!(outcome.attempts[1].found, 3);
    assert_eq!(outcome.strategy, FetchStrategy::Http);
}

#[tokio::test]
async fn test_coverage_failure_writes_no_manifest() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("site");
    let config = create_test_config(50, 1);
    let controller = EscalationController::with_tiers(
        StandardPorts::new(config.clone()),
        vec![FetchStrategy::Http, FetchStrategy::Http],
        50,
        Duration::ZERO,
    );

    let result = crawl_with(&controller, &server.uri(), &folder).await;

    assert!(matches!(
        result,
        Err(WeaveError::CoverageNotMet {
            found: 3,
            threshold: 50,
            attempts: 2
        })
    ));
    assert!(!folder.join(MANIFEST_FILE).exists());
}

#[tokio::test]
async fn test_missing_browser_fails_last_tier() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("site");
    let result = crawl_site(&create_test_config(50, 1), &server.uri(), &folder).await;

    assert!(matches!(result, Err(WeaveError::ToolUnavailable { .. })));
    assert!(!folder.join(MANIFEST_FILE).exists());
}

#[tokio::test]
async fn test_crawl_then_harvest() {
    let server = MockServer::start().await;
    mount_small_site(&server).await;

    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("site");
    let config = create_test_config(3, 1);

    crawl_site(&config, &server.uri(), &folder).await.unwrap();
    let report = harvest_site(&config, &folder.join(MANIFEST_FILE), &folder)
        .await
        .unwrap();

    assert_eq!(report.saved, vec!["index", "page1", "page2"]);
    assert!(report.failed.is_empty());
    assert_eq!(
        std::fs::read_to_string(folder.join("page2.md")).unwrap(),
        "Page two"
    );
    assert!(std::fs::read_to_string(folder.join("page1.md"))
        .unwrap()
        .starts_with("Page one"));

    // A second harvest finds nothing new
    let again = harvest_site(&config, &folder.join(MANIFEST_FILE), &folder)
        .await
        .unwrap();
    assert!(again.saved.is_empty());
    assert_eq!(again.unchanged.len(), 3);
}
