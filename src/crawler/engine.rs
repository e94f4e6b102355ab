//! Breadth-first crawl engine
//!
//! One engine instance performs exactly one run over a single `FetchPort`:
//!
//! 1. Seed the frontier with the canonical base URL
//! 2. Pop the earliest-queued URL and mark it visited
//! 3. Fetch it; a failure is a dead end, never an error
//! 4. On success, record it and queue every in-scope anchor target not yet
//!    seen (canonicalized first)
//! 5. Stop when the frontier is empty

use crate::crawler::frontier::Frontier;
use crate::crawler::parser::extract_links;
use crate::crawler::port::{FetchPort, FetchStrategy};
use crate::state::RunState;
use crate::url::{normalize_url, DomainScope};
use crate::WeaveError;
use std::collections::BTreeSet;
use std::time::Duration;
use url::Url;

/// URLs successfully fetched during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    /// Fetched URLs in visit order
    urls: Vec<String>,

    /// URLs visited but not fetched
    failed: Vec<String>,
}

impl CrawlResult {
    /// Number of successfully fetched URLs
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Fetched URLs in visit order
    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    /// Visited URLs whose fetch failed; excluded from the manifest
    pub fn failed(&self) -> &[String] {
        &self.failed
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.iter().any(|u| u == url)
    }

    /// Sorted, deduplicated URL list as written to the manifest
    pub fn manifest(&self) -> Vec<String> {
        self.urls
            .iter()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Breadth-first traversal of one site through a `FetchPort`
pub struct BfsEngine<'a> {
    port: &'a dyn FetchPort,
    base_url: String,
    scope: DomainScope,
    frontier: Frontier,
    delay: Duration,
    state: RunState,
    result: CrawlResult,
}

impl<'a> BfsEngine<'a> {
    /// Creates an engine for `base_url`
    ///
    /// # Arguments
    ///
    /// * `port` - Page fetcher for this run
    /// * `base_url` - Start of the crawl; its host defines the scope
    /// * `delay` - Pause after each successful fetch
    ///
    /// # Returns
    ///
    /// * `Ok(BfsEngine)` - Engine in the `Init` state
    /// * `Err(WeaveError)` - The base URL is not a crawlable HTTP(S) URL
    pub fn new(port: &'a dyn FetchPort, base_url: &str, delay: Duration) -> Result<Self, WeaveError> {
        let base_url = normalize_url(base_url)?;
        let scope = DomainScope::from_url(&base_url)?;

        Ok(Self {
            port,
            base_url,
            scope,
            frontier: Frontier::new(),
            delay,
            state: RunState::Init,
            result: CrawlResult::default(),
        })
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn scope(&self) -> &DomainScope {
        &self.scope
    }

    pub fn strategy(&self) -> FetchStrategy {
        self.port.strategy()
    }

    /// Drains the frontier and returns the frozen crawl result
    pub async fn run(mut self) -> Result<CrawlResult, WeaveError> {
        self.state.transition(RunState::Running)?;
        tracing::info!(
            "Starting {} crawl of {} (scope: {})",
            self.port.strategy(),
            self.base_url,
            self.scope.base_domain()
        );

        self.frontier.push(self.base_url.clone());

        while let Some(url) = self.frontier.pop() {
            if !self.frontier.mark_visited(&url) {
                continue;
            }

            tracing::info!("Crawling {}", url);
            let Some(html) = self.port.fetch(&url).await else {
                self.result.failed.push(url);
                continue;
            };

            self.result.urls.push(url.clone());
            let found = self.enqueue_links(&url, &html);
            tracing::debug!(
                "  Found {} links on {} ({} queued)",
                found,
                url,
                self.frontier.len()
            );

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }

        self.state.transition(RunState::Done)?;
        tracing::info!(
            "{} crawl finished: {} fetched, {} failed",
            self.port.strategy(),
            self.result.urls.len(),
            self.result.failed.len()
        );

        Ok(self.result)
    }

    /// Queues in-scope targets of a fetched page; returns the link count
    fn enqueue_links(&mut self, page_url: &str, html: &str) -> usize {
        let Ok(base) = Url::parse(page_url) else {
            return 0;
        };

        let links = extract_links(html, &base);
        for link in &links {
            let Ok(canonical) = normalize_url(link) else {
                continue;
            };

            if !self.scope.in_scope(&canonical) {
                tracing::trace!("Out of scope: {}", canonical);
                continue;
            }

            if self.frontier.push(canonical.clone()) {
                tracing::trace!("Queued {}", canonical);
            }
        }

        links.len()
    }
}
