//! Reachability checks for absolute URLs found in documents

use crate::config::UserAgentConfig;
use crate::crawler::{build_http_client, head_ok};
use crate::url::normalize_url;
use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashSet;
use std::time::Duration;

/// Decides whether an absolute URL is a valid link target
#[async_trait]
pub trait LinkChecker: Send + Sync {
    /// True if `url` answered with 200
    async fn is_reachable(&self, url: &str) -> bool;
}

/// Checks URLs with a HEAD request, following redirects
#[derive(Debug, Clone)]
pub struct HttpLinkChecker {
    client: Client,
}

impl HttpLinkChecker {
    pub fn new(user_agent: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl LinkChecker for HttpLinkChecker {
    async fn is_reachable(&self, url: &str) -> bool {
        head_ok(&self.client, url).await
    }
}

/// Treats URLs from the crawl manifest as reachable and asks `inner` about
/// everything else
///
/// Manifest URLs were fetched with status 200 during the crawl, so they are
/// not checked again.
pub struct ManifestChecker<C> {
    known: HashSet<String>,
    inner: C,
}

impl<C: LinkChecker> ManifestChecker<C> {
    pub fn new(manifest: &[String], inner: C) -> Self {
        Self {
            known: manifest
                .iter()
                .filter_map(|url| normalize_url(url).ok())
                .collect(),
            inner,
        }
    }

    pub fn is_known(&self, url: &str) -> bool {
        normalize_url(url)
            .map(|canonical| self.known.contains(&canonical))
            .unwrap_or(false)
    }
}

#[async_trait]
impl<C: LinkChecker> LinkChecker for ManifestChecker<C> {
    async fn is_reachable(&self, url: &str) -> bool {
        if self.is_known(url) {
            tracing::trace!("Known from manifest: {}", url);
            return true;
        }
        self.inner.is_reachable(url).await
    }
}
