//! Escalation controller
//!
//! Runs the BFS engine tier by tier until one tier's crawl result meets the
//! coverage threshold. The default plan is a bounded number of plain HTTP
//! attempts (the repeat absorbs transient failures) followed by one headless
//! browser attempt. Each attempt starts from scratch; results are never
//! merged across tiers.

use crate::config::{Config, CrawlerConfig};
use crate::crawler::browser::BrowserFetcher;
use crate::crawler::engine::{BfsEngine, CrawlResult};
use crate::crawler::fetcher::HttpFetcher;
use crate::crawler::port::{FetchPort, FetchStrategy};
use crate::WeaveError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Creates the fetch port for a strategy when its tier starts
///
/// Construction may fail (e.g. no browser and the download failed); that
/// failure is fatal for the tier that needs it.
#[async_trait]
pub trait PortProvider: Send + Sync {
    async fn port(&self, strategy: FetchStrategy) -> Result<Box<dyn FetchPort>, WeaveError>;
}

/// Builds the real HTTP and headless-browser ports from configuration
#[derive(Debug, Clone)]
pub struct StandardPorts {
    config: Config,
}

impl StandardPorts {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl PortProvider for StandardPorts {
    async fn port(&self, strategy: FetchStrategy) -> Result<Box<dyn FetchPort>, WeaveError> {
        match strategy {
            FetchStrategy::Http => Ok(Box::new(HttpFetcher::new(
                &self.config.user_agent,
                self.config.crawler.fetch_timeout(),
            )?)),
            FetchStrategy::Browser => Ok(Box::new(
                BrowserFetcher::launch(&self.config.browser, &self.config.user_agent).await?,
            )),
        }
    }
}

/// Record of one escalation attempt
#[derive(Debug, Clone)]
pub struct AttemptSummary {
    /// 1-based attempt number
    pub attempt: usize,
    pub strategy: FetchStrategy,
    /// URLs fetched successfully
    pub found: usize,
    /// URLs whose fetch failed
    pub failed: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub met_threshold: bool,
}

impl AttemptSummary {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

/// The accepted crawl and the attempts that led to it
#[derive(Debug, Clone)]
pub struct EscalationOutcome {
    pub result: CrawlResult,
    pub strategy: FetchStrategy,
    pub attempts: Vec<AttemptSummary>,
}

/// Orchestrates crawl attempts across fetch strategies
pub struct EscalationController<P: PortProvider> {
    provider: P,
    tiers: Vec<FetchStrategy>,
    threshold: usize,
    delay: Duration,
}

impl<P: PortProvider> EscalationController<P> {
    /// Creates a controller with the configured plan:
    /// `http_attempts` HTTP tiers, then one browser tier
    pub fn new(provider: P, config: &CrawlerConfig) -> Self {
        Self::with_tiers(
            provider,
            default_tiers(config.http_attempts),
            config.coverage_threshold,
            config.request_delay(),
        )
    }

    /// Creates a controller with an explicit tier order
    pub fn with_tiers(
        provider: P,
        tiers: Vec<FetchStrategy>,
        threshold: usize,
        delay: Duration,
    ) -> Self {
        Self {
            provider,
            tiers,
            threshold,
            delay,
        }
    }

    pub fn tiers(&self) -> &[FetchStrategy] {
        &self.tiers
    }

    /// Runs tiers in order, stopping at the first that meets the threshold
    ///
    /// # Returns
    ///
    /// * `Ok(EscalationOutcome)` - A tier found at least `threshold` URLs
    /// * `Err(WeaveError::CoverageNotMet)` - Every tier fell short
    /// * `Err(WeaveError::ToolUnavailable)` - A tier's fetcher could not be created
    pub async fn run(&self, base_url: &str) -> Result<EscalationOutcome, WeaveError> {
        let mut attempts = Vec::with_capacity(self.tiers.len());
        let mut last_found = 0;

        for (index, strategy) in self.tiers.iter().copied().enumerate() {
            let attempt = index + 1;
            tracing::info!(
                "Attempt {}/{}: {} crawl of {}",
                attempt,
                self.tiers.len(),
                strategy,
                base_url
            );

            let port = self.provider.port(strategy).await?;
            let started_at = Utc::now();
            let engine = BfsEngine::new(port.as_ref(), base_url, self.delay)?;
            let result = engine.run().await?;
            let met_threshold = result.len() >= self.threshold;

            attempts.push(AttemptSummary {
                attempt,
                strategy,
                found: result.len(),
                failed: result.failed().len(),
                started_at,
                finished_at: Utc::now(),
                met_threshold,
            });

            if met_threshold {
                tracing::info!(
                    "{} crawl succeeded with {} URLs",
                    strategy,
                    result.len()
                );
                return Ok(EscalationOutcome {
                    result,
                    strategy,
                    attempts,
                });
            }

            tracing::warn!(
                "{} crawl too small ({} URLs, need {}); discarding",
                strategy,
                result.len(),
                self.threshold
            );
            last_found = result.len();
        }

        Err(WeaveError::CoverageNotMet {
            found: last_found,
            threshold: self.threshold,
            attempts: attempts.len(),
        })
    }
}

/// HTTP tiers first, browser last
pub fn default_tiers(http_attempts: u32) -> Vec<FetchStrategy> {
    let mut tiers = vec![FetchStrategy::Http; http_attempts as usize];
    tiers.push(FetchStrategy::Browser);
    tiers
}
