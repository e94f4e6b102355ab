//! Harvest stage: fetch each manifest URL and store its main text
//!
//! Each URL becomes `<folder>/<corpus key>.md`. A document whose new text
//! hashes the same as the file already on disk is left untouched.

use crate::config::Config;
use crate::corpus::document_path;
use crate::crawler::{extract_main_text, BrowserFetcher, FetchPort, HttpFetcher};
use crate::output::read_manifest;
use crate::url::to_corpus_key;
use crate::WeaveError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Outcome of one harvest run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HarvestReport {
    /// Keys written because they were new or changed
    pub saved: Vec<String>,

    /// Keys whose content matched the file on disk
    pub unchanged: Vec<String>,

    /// URLs no fetcher could retrieve
    pub failed: Vec<String>,
}

impl HarvestReport {
    pub fn total(&self) -> usize {
        self.saved.len() + self.unchanged.len() + self.failed.len()
    }
}

/// SHA-256 of text content, hex encoded
pub fn content_hash(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

/// Fetches every URL through `ports` (first success wins) and writes its
/// extracted text into `folder`
///
/// Fetch failures are recorded in the report, never raised. Only failing to
/// write a document is an error.
pub async fn harvest(
    urls: &[String],
    folder: &Path,
    ports: &[&dyn FetchPort],
) -> Result<HarvestReport, WeaveError> {
    let mut report = HarvestReport::default();

    for url in urls {
        let key = to_corpus_key(url);

        let mut html = None;
        for port in ports {
            html = port.fetch(url).await;
            if html.is_some() {
                break;
            }
            tracing::debug!("{} fetch of {} failed", port.strategy(), url);
        }

        let Some(html) = html else {
            tracing::warn!("Failed to download {}", url);
            report.failed.push(url.clone());
            continue;
        };

        let text = extract_main_text(&html);
        let path = document_path(folder, &key);

        if let Ok(existing) = std::fs::read_to_string(&path) {
            if content_hash(&existing) == content_hash(&text) {
                tracing::debug!("Unchanged: {}", path.display());
                report.unchanged.push(key);
                continue;
            }
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, &text)?;
        tracing::info!("Saved: {}", path.display());
        report.saved.push(key);
    }

    Ok(report)
}

/// Harvests every URL of a manifest file into `folder`
///
/// With `prefer-browser` the headless browser is tried first and plain HTTP
/// is the fallback; a missing browser downgrades to HTTP only.
pub async fn harvest_site(
    config: &Config,
    manifest_path: &Path,
    folder: &Path,
) -> Result<HarvestReport, WeaveError> {
    let urls = read_manifest(manifest_path)?;
    tracing::info!("Harvesting {} URLs into {}", urls.len(), folder.display());

    let http = HttpFetcher::new(&config.user_agent, config.harvest.fetch_timeout())?;
    let browser = if config.harvest.prefer_browser {
        match BrowserFetcher::launch(&config.browser, &config.user_agent).await {
            Ok(browser) => Some(browser),
            Err(e) => {
                tracing::warn!("{}; harvesting over HTTP only", e);
                None
            }
        }
    } else {
        None
    };

    let mut ports: Vec<&dyn FetchPort> = Vec::with_capacity(2);
    if let Some(browser) = &browser {
        ports.push(browser);
    }
    ports.push(&http);

    std::fs::create_dir_all(folder)?;
    harvest(&urls, folder, &ports).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::testing::StubPort;
    use tempfile::TempDir;

    #[test]
    fn test_content_hash() {
        assert_eq!(content_hash("abc"), content_hash("abc"));
        assert_ne!(content_hash("abc"), content_hash("abd"));
        assert_eq!(content_hash("").len(), 64);
    }

    #[tokio::test]
    async fn test_harvest_writes_main_text_by_key() {
        let dir = TempDir::new().unwrap();
        let port = StubPort::new(&[
            (
                "https://example.com",
                "<html><body><nav>menu</nav><main><h1>Home</h1></main></body></html>",
            ),
            (
                "https://example.com/docs/page1",
                "<html><body><article><p>Page one</p></article></body></html>",
            ),
        ]);
        let urls = vec![
            "https://example.com".to_string(),
            "https://example.com/docs/page1".to_string(),
        ];

        let report = harvest(&urls, dir.path(), &[&port]).await.unwrap();

        assert_eq!(report.saved, vec!["index", "docs/page1"]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("index.md")).unwrap(),
            "Home"
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("docs/page1.md")).unwrap(),
            "Page one"
        );
    }

    #[tokio::test]
    async fn test_unchanged_document_not_rewritten() {
        let dir = TempDir::new().unwrap();
        let port = StubPort::new(&[("https://example.com/a", "<main>same</main>")]);
        let urls = vec!["https://example.com/a".to_string()];

        let first = harvest(&urls, dir.path(), &[&port]).await.unwrap();
        assert_eq!(first.saved, vec!["a"]);

        let second = harvest(&urls, dir.path(), &[&port]).await.unwrap();
        assert!(second.saved.is_empty());
        assert_eq!(second.unchanged, vec!["a"]);
    }

    #[tokio::test]
    async fn test_falls_back_to_next_port() {
        let dir = TempDir::new().unwrap();
        let primary = StubPort::new(&[]);
        let fallback = StubPort::new(&[("https://example.com/a", "<body>text</body>")]);
        let urls = vec!["https://example.com/a".to_string()];

        let report = harvest(&urls, dir.path(), &[&primary, &fallback])
            .await
            .unwrap();

        assert!(primary.was_requested("https://example.com/a"));
        assert_eq!(report.saved, vec!["a"]);
    }

    #[tokio::test]
    async fn test_colliding_keys_last_writer_wins() {
        let dir = TempDir::new().unwrap();
        let port = StubPort::new(&[
            ("https://example.com/docs?v=1", "<main>first</main>"),
            ("https://example.com/docs?v=2", "<main>second</main>"),
        ]);
        let urls = vec![
            "https://example.com/docs?v=1".to_string(),
            "https://example.com/docs?v=2".to_string(),
        ];

        let report = harvest(&urls, dir.path(), &[&port]).await.unwrap();

        assert_eq!(report.saved, vec!["docs", "docs"]);
        assert_eq!(
            std::fs::read_to_string(dir.path().join("docs.md")).unwrap(),
            "second"
        );
    }

    #[tokio::test]
    async fn test_failed_download_recorded() {
        let dir = TempDir::new().unwrap();
        let port = StubPort::new(&[]);
        let urls = vec!["https://example.com/missing".to_string()];

        let report = harvest(&urls, dir.path(), &[&port]).await.unwrap();
        assert_eq!(report.failed, urls);
        assert_eq!(report.total(), 1);
        assert!(!dir.path().join("missing.md").exists());
    }
}
