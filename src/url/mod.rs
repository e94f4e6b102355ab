//! URL handling module for Docweave
//!
//! This module provides URL canonicalization, domain scope decisions, and
//! the mapping from URLs to corpus-local keys shared by the crawler and the
//! link rewriter.

mod corpus_key;
mod domain;
mod normalize;
mod scope;

use crate::{UrlError, UrlResult};
use ::url::Url;

// Re-export main functions
pub use corpus_key::{relative_key, to_corpus_key};
pub use domain::{extract_domain, network_location, strip_www};
pub use normalize::normalize_url;
pub use scope::{in_scope, matches_suffix, DomainScope};

/// Derives an output folder name from a site URL
///
/// The network location (host plus any explicit port) has `.` and `/`
/// replaced by `_`.
///
/// # Examples
///
/// ```
/// use docweave::url::domain_to_folder;
///
/// assert_eq!(domain_to_folder("https://example.com/docs").unwrap(), "example_com");
/// assert_eq!(domain_to_folder("http://sub.domain.co.uk/").unwrap(), "sub_domain_co_uk");
/// ```
pub fn domain_to_folder(url: &str) -> UrlResult<String> {
    let parsed = Url::parse(url.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
    let location = network_location(&parsed).ok_or(UrlError::MissingDomain)?;
    Ok(location.replace(|c: char| c == '.' || c == '/', "_"))
}
