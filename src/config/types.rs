use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Docweave
///
/// Every section is optional; a missing file or section yields the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default, rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
    #[serde(default)]
    pub harvest: HarvestConfig,
    #[serde(default)]
    pub rewrite: RewriteConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Delay after each successful page fetch (milliseconds)
    #[serde(rename = "request-delay")]
    pub request_delay: u64,

    /// Per-request timeout for the plain HTTP port (seconds)
    #[serde(rename = "fetch-timeout")]
    pub fetch_timeout: u64,

    /// Minimum number of URLs an escalation tier must find to be accepted
    #[serde(rename = "coverage-threshold")]
    pub coverage_threshold: usize,

    /// Number of plain HTTP tiers tried before the browser tier
    #[serde(rename = "http-attempts")]
    pub http_attempts: u32,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            request_delay: 500,
            fetch_timeout: 10,
            coverage_threshold: 20,
            http_attempts: 2,
        }
    }
}

impl CrawlerConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "docweave".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Mozilla/5.0 (compatible; Name/Version)`
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{})",
            self.crawler_name, self.crawler_version
        )
    }
}

/// Headless browser configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Explicit browser binary; when absent the PATH is searched
    pub binary: Option<String>,

    /// Per-page navigation and render timeout (seconds)
    #[serde(rename = "navigation-timeout")]
    pub navigation_timeout: u64,

    /// Download Chromium when no browser is installed
    #[serde(rename = "auto-install")]
    pub auto_install: bool,

    /// Where downloaded Chromium builds are kept
    #[serde(rename = "install-dir")]
    pub install_dir: Option<String>,

    /// CSS selector that must appear before the page is captured
    #[serde(rename = "wait-selector")]
    pub wait_selector: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            binary: None,
            navigation_timeout: 30,
            auto_install: true,
            install_dir: None,
            wait_selector: None,
        }
    }
}

impl BrowserConfig {
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_secs(self.navigation_timeout)
    }

    pub fn install_dir(&self) -> PathBuf {
        match &self.install_dir {
            Some(dir) => PathBuf::from(dir),
            None => std::env::temp_dir().join("docweave-chromium"),
        }
    }
}

/// Document harvesting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HarvestConfig {
    /// Per-request timeout for document downloads (seconds)
    #[serde(rename = "fetch-timeout")]
    pub fetch_timeout: u64,

    /// Render pages with the headless browser first, falling back to HTTP
    #[serde(rename = "prefer-browser")]
    pub prefer_browser: bool,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            fetch_timeout: 15,
            prefer_browser: false,
        }
    }
}

impl HarvestConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }
}

/// Link rewriting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RewriteConfig {
    /// Timeout for each HEAD reachability check (seconds)
    #[serde(rename = "check-timeout")]
    pub check_timeout: u64,

    /// Link style written into documents
    pub format: OutputFormat,

    /// Label whose `[[label]]/path` double-rewrite artifacts are collapsed;
    /// defaults to the manifest's base domain
    #[serde(rename = "self-label")]
    pub self_label: Option<String>,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self {
            check_timeout: 5,
            format: OutputFormat::Markdown,
            self_label: None,
        }
    }
}

impl RewriteConfig {
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout)
    }
}

/// Link style produced by the rewriter and backlink injector
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
pub enum OutputFormat {
    /// `[[key]]` wiki-style links
    #[default]
    #[serde(rename = "md")]
    Markdown,

    /// `[key](key.html)` links
    #[serde(rename = "html")]
    Html,
}

impl OutputFormat {
    /// Formats a link to a corpus key in this style
    ///
    /// ```
    /// use docweave::OutputFormat;
    ///
    /// assert_eq!(OutputFormat::Markdown.link("docs/page1"), "[[docs/page1]]");
    /// assert_eq!(OutputFormat::Html.link("docs/page1"), "[docs/page1](docs/page1.html)");
    /// ```
    pub fn link(&self, key: &str) -> String {
        match self {
            Self::Markdown => format!("[[{}]]", key),
            Self::Html => format!("[{}]({}.html)", key, key),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Html => "html",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "html" => Ok(Self::Html),
            other => Err(format!("unknown output format '{}', expected md or html", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.crawler.coverage_threshold, 20);
        assert_eq!(config.crawler.http_attempts, 2);
        assert_eq!(config.crawler.request_delay(), Duration::from_millis(500));
        assert_eq!(config.rewrite.format, OutputFormat::Markdown);
        assert!(config.browser.binary.is_none());
    }

    #[test]
    fn test_user_agent_header() {
        let ua = UserAgentConfig {
            crawler_name: "SitemapBuilder".to_string(),
            crawler_version: "1.0".to_string(),
        };
        assert_eq!(
            ua.header_value(),
            "Mozilla/5.0 (compatible; SitemapBuilder/1.0)"
        );
    }

    #[test]
    fn test_output_format_parse() {
        assert_eq!("md".parse::<OutputFormat>(), Ok(OutputFormat::Markdown));
        assert_eq!("HTML".parse::<OutputFormat>(), Ok(OutputFormat::Html));
        assert!("rtf".parse::<OutputFormat>().is_err());
    }
}
