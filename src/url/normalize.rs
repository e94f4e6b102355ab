use crate::UrlError;
use url::Url;

/// Canonicalizes a URL for frontier identity
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject anything that is not HTTP(S) or has no host
/// 3. Lowercase the host (done by the parser)
/// 4. Remove fragment (everything after #)
/// 5. Remove trailing slashes, including the one the parser adds to a bare host
///
/// The query string is kept as-is.
///
/// # Arguments
///
/// * `url_str` - The URL string to normalize
///
/// # Returns
///
/// * `Ok(String)` - Canonical URL
/// * `Err(UrlError)` - Failed to parse or the URL is not crawlable
///
/// # Examples
///
/// ```
/// use docweave::url::normalize_url;
///
/// let url = normalize_url("http://EXAMPLE.COM/docs/#intro").unwrap();
/// assert_eq!(url, "http://example.com/docs");
/// ```
pub fn normalize_url(url_str: &str) -> Result<String, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_trailing_slash() {
        let result = normalize_url("https://example.com/page/").unwrap();
        assert_eq!(result, "https://example.com/page");
    }

    #[test]
    fn test_bare_host_has_no_slash() {
        assert_eq!(
            normalize_url("http://example.com").unwrap(),
            "http://example.com"
        );
        assert_eq!(
            normalize_url("http://example.com/").unwrap(),
            "http://example.com"
        );
    }

    #[test]
    fn test_remove_fragment() {
        let result = normalize_url("https://example.com/page#section").unwrap();
        assert_eq!(result, "https://example.com/page");
    }

    #[test]
    fn test_fragment_and_slash_variants_collapse() {
        let variants = [
            "https://example.com/docs",
            "https://example.com/docs/",
            "https://example.com/docs#top",
            "https://example.com/docs/#top",
        ];

        for variant in variants {
            assert_eq!(
                normalize_url(variant).unwrap(),
                "https://example.com/docs",
                "variant {} did not collapse",
                variant
            );
        }
    }

    #[test]
    fn test_query_is_kept() {
        let result = normalize_url("https://example.com/search?q=rust#results").unwrap();
        assert_eq!(result, "https://example.com/search?q=rust");
    }

    #[test]
    fn test_lowercase_host_only() {
        let result = normalize_url("https://EXAMPLE.COM/Page").unwrap();
        assert_eq!(result, "https://example.com/Page");
    }

    #[test]
    fn test_http_scheme_preserved() {
        let result = normalize_url("http://example.com/page").unwrap();
        assert_eq!(result, "http://example.com/page");
    }

    #[test]
    fn test_invalid_scheme() {
        let result = normalize_url("ftp://example.com/page");
        assert!(matches!(result.unwrap_err(), UrlError::InvalidScheme(_)));
    }

    #[test]
    fn test_malformed_url() {
        assert!(normalize_url("not a url").is_err());
        assert!(normalize_url("/relative/path").is_err());
    }
}
