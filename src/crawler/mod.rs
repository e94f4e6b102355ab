//! Crawler module for site discovery
//!
//! This module contains the crawl logic, including:
//! - HTTP and headless-browser page fetching behind one `FetchPort` trait
//! - HTML link extraction and main-text extraction
//! - The breadth-first engine and its frontier
//! - Tiered escalation across fetch strategies

mod browser;
mod engine;
mod escalation;
mod fetcher;
mod frontier;
mod parser;
mod port;

pub use browser::{
    resolve_executable, BrowserFetcher, BrowserInstaller, ChromiumDownloader, BROWSER_CANDIDATES,
};
pub use engine::{BfsEngine, CrawlResult};
pub use escalation::{
    default_tiers, AttemptSummary, EscalationController, EscalationOutcome, PortProvider,
    StandardPorts,
};
pub use fetcher::{build_http_client, fetch_url, head_ok, FetchResult, HttpFetcher};
pub use frontier::Frontier;
pub use parser::{extract_links, extract_main_text};
pub use port::{FetchPort, FetchStrategy};

use crate::config::Config;
use crate::output::{write_manifest, write_sitemap};
use crate::WeaveError;
use std::path::Path;

/// Runs a complete crawl of `base_url` and records its URL list
///
/// This is the main entry point for the crawl stage. It will:
/// 1. Escalate through the configured fetch tiers until one finds enough URLs
/// 2. Write the sorted URL manifest (`urls.txt`) into `output_folder`
/// 3. Write the same URLs as `sitemap.xml` alongside it
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `base_url` - Start of the crawl
/// * `output_folder` - Corpus folder; created if missing
///
/// # Returns
///
/// * `Ok(EscalationOutcome)` - The accepted crawl and its attempt history
/// * `Err(WeaveError)` - No tier met the threshold, or the output could not be written
pub async fn crawl_site(
    config: &Config,
    base_url: &str,
    output_folder: &Path,
) -> Result<EscalationOutcome, WeaveError> {
    let controller = EscalationController::new(StandardPorts::new(config.clone()), &config.crawler);
    crawl_with(&controller, base_url, output_folder).await
}

/// Same as [`crawl_site`] with a caller-supplied controller
pub async fn crawl_with<P: PortProvider>(
    controller: &EscalationController<P>,
    base_url: &str,
    output_folder: &Path,
) -> Result<EscalationOutcome, WeaveError> {
    let outcome = controller.run(base_url).await?;
    let urls = outcome.result.manifest();

    std::fs::create_dir_all(output_folder)?;
    let manifest_path = write_manifest(output_folder, &urls)?;
    let sitemap_path = write_sitemap(output_folder, &urls)?;

    tracing::info!(
        "Saved {} URLs to {} and {}",
        urls.len(),
        manifest_path.display(),
        sitemap_path.display()
    );

    Ok(outcome)
}
