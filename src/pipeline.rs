//! Full pipeline: crawl → harvest → rewrite → clean
//!
//! Stages run strictly in sequence over one corpus folder; the first stage
//! error aborts the run.

use crate::config::{Config, OutputFormat};
use crate::corpus::{clean_corpus, harvest_site, CleanReport, HarvestReport};
use crate::crawler::{crawl_site, EscalationOutcome};
use crate::output::MANIFEST_FILE;
use crate::rewrite::{rewrite_site, SiteRewrite};
use crate::url::domain_to_folder;
use crate::WeaveError;
use std::path::{Path, PathBuf};

/// Reports from every stage of one pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub folder: PathBuf,
    pub crawl: EscalationOutcome,
    pub harvest: HarvestReport,
    pub rewrite: SiteRewrite,
    pub clean: CleanReport,
}

/// Corpus folder for `base_url` under `parent`
pub fn site_folder(parent: &Path, base_url: &str) -> Result<PathBuf, WeaveError> {
    Ok(parent.join(domain_to_folder(base_url)?))
}

/// Runs every stage for `base_url`, building the corpus under `parent`
pub async fn run_pipeline(
    config: &Config,
    base_url: &str,
    parent: &Path,
    format: OutputFormat,
) -> Result<PipelineReport, WeaveError> {
    let folder = site_folder(parent, base_url)?;
    tracing::info!("Building corpus for {} in {}", base_url, folder.display());

    tracing::info!("[1/4] Crawling");
    let crawl = crawl_site(config, base_url, &folder).await?;

    tracing::info!("[2/4] Harvesting");
    let harvest = harvest_site(config, &folder.join(MANIFEST_FILE), &folder).await?;

    tracing::info!("[3/4] Rewriting links");
    let rewrite = rewrite_site(config, &folder, format).await?;

    tracing::info!("[4/4] Cleaning");
    let clean = clean_corpus(&folder)?;

    Ok(PipelineReport {
        folder,
        crawl,
        harvest,
        rewrite,
        clean,
    })
}
