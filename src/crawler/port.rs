//! The fetch capability the crawler and harvester are built on

use async_trait::async_trait;
use std::fmt;

/// Page retrieval strategy used by an escalation tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchStrategy {
    /// Plain HTTP GET
    Http,

    /// Headless browser render
    Browser,
}

impl FetchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Browser => "browser",
        }
    }
}

impl fmt::Display for FetchStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Retrieves the HTML of a page
///
/// Implementations bound each call by their own timeout. Any failure
/// (timeout, non-200 status, network error, missing output) is reported as
/// `None`; nothing is raised past this boundary.
#[async_trait]
pub trait FetchPort: Send + Sync {
    /// Strategy this port implements, for logs and summaries
    fn strategy(&self) -> FetchStrategy;

    /// Fetches `url`, returning its HTML on success
    async fn fetch(&self, url: &str) -> Option<String>;
}
