use super::domain::strip_www;
use crate::{UrlError, UrlResult};
use url::Url;

/// Checks if a host is the base domain or one of its subdomains
///
/// Matching is done on whole labels:
/// - "example.com" matches "example.com"
/// - "docs.example.com" and "api.v2.example.com" match "example.com"
/// - "notexample.com" does not match "example.com"
///
/// # Examples
///
/// ```
/// use docweave::url::matches_suffix;
///
/// assert!(matches_suffix("example.com", "example.com"));
/// assert!(matches_suffix("example.com", "docs.example.com"));
/// assert!(!matches_suffix("example.com", "notexample.com"));
/// ```
pub fn matches_suffix(base: &str, candidate: &str) -> bool {
    candidate == base || candidate.ends_with(&format!(".{}", base))
}

/// Decides whether candidate URLs are internal to a crawl target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainScope {
    base_domain: String,
}

impl DomainScope {
    /// Creates a scope for a bare domain (lowercased, `www.` removed)
    pub fn new(base_domain: &str) -> Self {
        Self {
            base_domain: strip_www(base_domain),
        }
    }

    /// Creates a scope from the crawl's base URL
    pub fn from_url(base_url: &str) -> UrlResult<Self> {
        let url = Url::parse(base_url.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        let host = url.host_str().ok_or(UrlError::MissingDomain)?;
        Ok(Self::new(host))
    }

    /// The lowercased base domain without `www.`
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    /// Returns true when the candidate is an HTTP(S) URL on the base domain
    /// or a subdomain of it. Malformed URLs are out of scope.
    pub fn in_scope(&self, candidate_url: &str) -> bool {
        let Ok(url) = Url::parse(candidate_url.trim()) else {
            return false;
        };

        if url.scheme() != "http" && url.scheme() != "https" {
            return false;
        }

        match url.host_str() {
            Some(host) if !host.is_empty() => matches_suffix(&self.base_domain, &strip_www(host)),
            _ => false,
        }
    }
}

/// Free-function form of [`DomainScope::in_scope`]
pub fn in_scope(candidate_url: &str, base_domain: &str) -> bool {
    DomainScope::new(base_domain).in_scope(candidate_url)
}
