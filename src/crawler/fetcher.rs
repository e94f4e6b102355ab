//! HTTP fetcher implementation
//!
//! This module handles plain HTTP page retrieval and the HEAD requests used
//! for link reachability checks:
//! - Building HTTP clients with the configured user agent and timeout
//! - GET requests classified into success / HTTP error / network error
//! - The `FetchPort` implementation used by the HTTP escalation tiers

use crate::config::UserAgentConfig;
use crate::crawler::port::{FetchPort, FetchStrategy};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Upper bound on the TCP connect phase, whatever the request timeout
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Page returned 200 with a readable body
    Success {
        /// Final URL after redirects
        final_url: String,
        /// Page body content
        body: String,
    },

    /// Any status other than 200
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body decode failure)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed with reqwest's default policy; the status of the
/// final response decides success.
///
/// # Example
///
/// ```no_run
/// use docweave::config::UserAgentConfig;
/// use docweave::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 200 with text body | `Success` |
/// | Any other status | `HttpError` |
/// | Timeout / connect / decode error | `NetworkError` |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if status != StatusCode::OK {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success { final_url, body },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                },
            }
        }
        Err(e) => {
            let error = if e.is_timeout() {
                "Request timeout".to_string()
            } else if e.is_connect() {
                "Connection refused".to_string()
            } else {
                e.to_string()
            };
            FetchResult::NetworkError { error }
        }
    }
}

/// Sends a HEAD request and reports whether the final status is 200
///
/// Redirects are followed. Every failure counts as unreachable.
pub async fn head_ok(client: &Client, url: &str) -> bool {
    match client.head(url).send().await {
        Ok(response) => {
            let ok = response.status() == StatusCode::OK;
            tracing::debug!("Checked URL: {} -> {}", url, response.status().as_u16());
            ok
        }
        Err(e) => {
            tracing::debug!("URL check failed: {} -> {}", url, e);
            false
        }
    }
}

/// `FetchPort` backed by a plain HTTP client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with its own client
    pub fn new(user_agent: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(user_agent, timeout)?,
        })
    }

    /// Wraps an existing client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl FetchPort for HttpFetcher {
    fn strategy(&self) -> FetchStrategy {
        FetchStrategy::Http
    }

    async fn fetch(&self, url: &str) -> Option<String> {
        match fetch_url(&self.client, url).await {
            FetchResult::Success { final_url, body } => {
                if final_url.trim_end_matches('/') != url.trim_end_matches('/') {
                    tracing::debug!("{} redirected to {}", url, final_url);
                }
                Some(body)
            }
            FetchResult::HttpError { status_code } => {
                tracing::warn!("Failed {}: HTTP {}", url, status_code);
                None
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!("Failed {}: {}", url, error);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> Client {
        build_http_client(&UserAgentConfig::default(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(1));
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<p>hello</p>"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::with_client(client());
        let body = fetcher.fetch(&format!("{}/page", server.uri())).await;
        assert_eq!(body.as_deref(), Some("<p>hello</p>"));
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_failure() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/created"))
            .respond_with(ResponseTemplate::new(201).set_body_string("made"))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::with_client(client());
        assert!(fetcher
            .fetch(&format!("{}/missing", server.uri()))
            .await
            .is_none());
        assert!(fetcher
            .fetch(&format!("{}/created", server.uri()))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_fetch_result_classification() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/error"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let result = fetch_url(&client(), &format!("{}/error", server.uri())).await;
        assert!(matches!(result, FetchResult::HttpError { status_code: 503 }));
    }

    #[tokio::test]
    async fn test_fetch_connection_refused() {
        // Port 9 (discard) is closed on test machines
        let result = fetch_url(&client(), "http://127.0.0.1:9/").await;
        assert!(matches!(result, FetchResult::NetworkError { .. }));
    }

    #[tokio::test]
    async fn test_head_ok() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/ok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;
        Mock::given(method("HEAD"))
            .and(path("/gone"))
            .respond_with(ResponseTemplate::new(410))
            .mount(&server)
            .await;

        assert!(head_ok(&client(), &format!("{}/ok", server.uri())).await);
        assert!(!head_ok(&client(), &format!("{}/gone", server.uri())).await);
    }
}
