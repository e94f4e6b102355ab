//! Integration tests for link rewriting and backlink injection
//!
//! Corpora live in temporary folders; reachability is either stubbed or
//! served by a wiremock server.

use async_trait::async_trait;
use docweave::config::{Config, OutputFormat};
use docweave::corpus::{clean_corpus, Corpus};
use docweave::output::write_sitemap;
use docweave::rewrite::{
    inject_backlinks, rewrite_site, LinkChecker, LinkRewriter, MentionIndex, RELATED_MARKER,
};
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Marks URLs on example.com reachable and everything else not
struct ExampleOnly;

#[async_trait]
impl LinkChecker for ExampleOnly {
    async fn is_reachable(&self, url: &str) -> bool {
        url.starts_with("https://example.com/")
    }
}

fn write_doc(root: &Path, key: &str, content: &str) {
    let path = root.join(format!("{}.md", key));
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn read_doc(root: &Path, key: &str) -> String {
    std::fs::read_to_string(root.join(format!("{}.md", key))).unwrap()
}

fn create_test_config() -> Config {
    let mut config = Config::default();
    config.rewrite.check_timeout = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    config
}

#[tokio::test]
async fn test_mixed_links_scenario() {
    let dir = TempDir::new().unwrap();
    write_doc(
        dir.path(),
        "a",
        "See https://example.com/docs/page1 and https://bad.com/invalid. Also see /guide/intro",
    );

    let mut corpus = Corpus::load(dir.path()).unwrap();
    let mut rewriter = LinkRewriter::new(ExampleOnly, OutputFormat::Markdown).unwrap();
    let report = rewriter.rewrite_corpus(&mut corpus).await;
    corpus.save().unwrap();

    assert_eq!(
        read_doc(dir.path(), "a"),
        "See [[docs/page1]] and https://bad.com/invalid. Also see [[guide/intro]]"
    );
    assert_eq!(report.links_rewritten, 2);
    assert_eq!(report.skipped, vec!["https://bad.com/invalid"]);
}

#[tokio::test]
async fn test_later_documents_reuse_earlier_resolutions() {
    let dir = TempDir::new().unwrap();
    write_doc(dir.path(), "a", "first https://example.com/docs/page1");
    write_doc(dir.path(), "guide/b", "again https://example.com/docs/page1");

    let mut corpus = Corpus::load(dir.path()).unwrap();
    let mut rewriter = LinkRewriter::new(ExampleOnly, OutputFormat::Markdown).unwrap();
    rewriter.rewrite_corpus(&mut corpus).await;

    // Resolved while processing `a`, reused unchanged for `guide/b`
    assert_eq!(
        corpus.get("guide/b").unwrap().content(),
        "again [[docs/page1]]"
    );
    assert_eq!(rewriter.url_map().len(), 1);
}

#[tokio::test]
async fn test_rewrite_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write_doc(
        dir.path(),
        "a",
        "https://example.com/x and https://bad.com/y and (/z)",
    );

    for _ in 0..2 {
        let mut corpus = Corpus::load(dir.path()).unwrap();
        let mut rewriter = LinkRewriter::new(ExampleOnly, OutputFormat::Html).unwrap();
        rewriter.rewrite_corpus(&mut corpus).await;
        corpus.save().unwrap();
    }

    assert_eq!(
        read_doc(dir.path(), "a"),
        "[x](x.html) and https://bad.com/y and ([z](z.html))"
    );
}

#[tokio::test]
async fn test_backlinks_injected_once() {
    let dir = TempDir::new().unwrap();
    write_doc(dir.path(), "docs/getting-started", "Install the tool.");
    write_doc(dir.path(), "faq", "Read Getting Started first.");
    write_doc(dir.path(), "blog", "Nothing relevant.");

    for _ in 0..2 {
        let mut corpus = Corpus::load(dir.path()).unwrap();
        let index = MentionIndex::build(&corpus).unwrap();
        inject_backlinks(&mut corpus, &index, OutputFormat::Markdown);
        corpus.save().unwrap();
    }

    let content = read_doc(dir.path(), "docs/getting-started");
    assert_eq!(content.matches(RELATED_MARKER).count(), 1);
    assert!(content.ends_with("**Related:**\n\n- [[faq]]\n"));
    assert!(!read_doc(dir.path(), "blog").contains(RELATED_MARKER));
}

#[tokio::test]
async fn test_rewrite_site_with_manifest() {
    let server = MockServer::start().await;
    let base_url = server.uri();

    // Manifest URLs are never checked over the network
    Mock::given(method("HEAD"))
        .and(path("/docs/page1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/docs/unlisted"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    write_sitemap(
        dir.path(),
        &[base_url.clone(), format!("{}/docs/page1", base_url)],
    )
    .unwrap();
    write_doc(
        dir.path(),
        "index",
        &format!(
            "Start at {}/docs/page1 then {}/docs/unlisted, not {}/docs/missing",
            base_url, base_url, base_url
        ),
    );
    write_doc(dir.path(), "docs/page1", "Back to the index.");

    let rewrite = rewrite_site(&create_test_config(), dir.path(), OutputFormat::Markdown)
        .await
        .unwrap();

    assert_eq!(
        read_doc(dir.path(), "index"),
        format!(
            "Start at [[docs/page1]] then [[docs/unlisted]], not {}/docs/missing\n\n---\n\n**Related:**\n\n- [[docs/page1]]\n",
            base_url
        )
    );
    assert_eq!(rewrite.links.links_rewritten, 2);
    assert_eq!(rewrite.links.skipped, vec![format!("{}/docs/missing", base_url)]);
    assert_eq!(rewrite.backlinks.injected, vec!["docs/page1", "index"]);
    assert!(read_doc(dir.path(), "docs/page1").ends_with("- [[index]]\n"));

    // A second run leaves every file as it is
    let before = read_doc(dir.path(), "index");
    let second = rewrite_site(&create_test_config(), dir.path(), OutputFormat::Markdown)
        .await
        .unwrap();
    assert_eq!(read_doc(dir.path(), "index"), before);
    assert_eq!(second.saved, 0);
}

#[tokio::test]
async fn test_clean_after_rewrite_keeps_marker() {
    let dir = TempDir::new().unwrap();
    write_doc(dir.path(), "faq", "Questions.   ");
    write_doc(dir.path(), "a", "see faq");
    write_doc(dir.path(), "empty", "#");

    let mut corpus = Corpus::load(dir.path()).unwrap();
    let index = MentionIndex::build(&corpus).unwrap();
    inject_backlinks(&mut corpus, &index, OutputFormat::Markdown);
    corpus.save().unwrap();

    let report = clean_corpus(dir.path()).unwrap();
    assert_eq!(report.removed_files.len(), 1);
    assert_eq!(
        read_doc(dir.path(), "faq"),
        "Questions.\n\n---\n\n**Related:**\n\n- [[a]]"
    );
}
