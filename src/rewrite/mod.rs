//! Link-graph rewriting for a harvested corpus
//!
//! This module handles:
//! - Turning absolute and root-relative URLs into corpus-local links
//! - Building the mention index over the rewritten corpus
//! - Appending "Related" backlink sections exactly once

mod backlinks;
mod links;
mod reachability;

pub use backlinks::{
    display_slug, inject_backlinks, related_section, BacklinkReport, MentionIndex, RELATED_MARKER,
};
pub use links::{LinkRewriter, RewriteReport, Token, TokenKind, TokenScanner, UrlMap};
pub use reachability::{HttpLinkChecker, LinkChecker, ManifestChecker};

use crate::config::{Config, OutputFormat};
use crate::corpus::Corpus;
use crate::output::{read_manifest, read_sitemap, MANIFEST_FILE, SITEMAP_FILE};
use crate::url::DomainScope;
use crate::WeaveError;
use std::path::Path;

/// Result of rewriting one corpus folder
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteRewrite {
    pub links: RewriteReport,
    pub backlinks: BacklinkReport,
    /// Documents written back to disk
    pub saved: usize,
}

/// Loads the crawl's URL list from `sitemap.xml`, else `urls.txt`
///
/// A missing or unreadable manifest yields `None`; the rewrite then runs
/// without scope or known URLs.
pub fn load_site_manifest(folder: &Path) -> Option<Vec<String>> {
    let sitemap = folder.join(SITEMAP_FILE);
    let manifest = folder.join(MANIFEST_FILE);

    let loaded = if sitemap.is_file() {
        read_sitemap(&sitemap)
    } else if manifest.is_file() {
        read_manifest(&manifest)
    } else {
        return None;
    };

    match loaded {
        Ok(urls) if !urls.is_empty() => {
            tracing::info!("Loaded {} known URLs from the crawl manifest", urls.len());
            Some(urls)
        }
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("Ignoring crawl manifest in {}: {}", folder.display(), e);
            None
        }
    }
}

/// Rewrites links and injects backlinks across every document in `folder`
///
/// # Arguments
///
/// * `config` - Supplies the user agent, check timeout and self label
/// * `folder` - Corpus folder, rewritten in place
/// * `format` - Link style to write
pub async fn rewrite_site(
    config: &Config,
    folder: &Path,
    format: OutputFormat,
) -> Result<SiteRewrite, WeaveError> {
    let mut corpus = Corpus::load(folder)?;
    tracing::info!("Rewriting {} documents in {}", corpus.len(), folder.display());

    let manifest = load_site_manifest(folder).unwrap_or_default();
    let scope = manifest
        .first()
        .and_then(|url| DomainScope::from_url(url).ok());

    let http = HttpLinkChecker::new(&config.user_agent, config.rewrite.check_timeout())?;
    let checker = ManifestChecker::new(&manifest, http);
    let mut rewriter = LinkRewriter::new(checker, format)?;

    let label = config
        .rewrite
        .self_label
        .clone()
        .or_else(|| scope.as_ref().map(|s| s.base_domain().to_string()));
    if let Some(label) = label {
        rewriter = rewriter.with_self_label(&label)?;
    }
    if let Some(scope) = scope {
        rewriter = rewriter.with_scope(scope);
    }

    let links = rewriter.rewrite_corpus(&mut corpus).await;
    let index = MentionIndex::build(&corpus)?;
    let backlinks = inject_backlinks(&mut corpus, &index, format);
    let saved = corpus.save()?;

    Ok(SiteRewrite {
        links,
        backlinks,
        saved,
    })
}
