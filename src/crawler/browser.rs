//! Headless browser fetcher
//!
//! Drives a Chromium-family browser over the DevTools protocol. The browser
//! is taken from configuration or PATH; when neither has one, a Chromium
//! build is downloaded on demand. One navigation runs at a time and each is
//! bounded by the configured navigation timeout, including the wait for the
//! optional ready selector.

use crate::config::{BrowserConfig, UserAgentConfig};
use crate::crawler::port::{FetchPort, FetchStrategy};
use crate::WeaveError;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::fetcher::{BrowserFetcher as ChromiumFetcher, BrowserFetcherOptions};
use chromiumoxide::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Binary names searched on PATH when no explicit binary is configured
pub const BROWSER_CANDIDATES: &[&str] = &[
    "chromium",
    "chromium-browser",
    "google-chrome",
    "google-chrome-stable",
    "chrome",
];

const TOOL_NAME: &str = "headless browser";

/// Interval between checks for the ready selector
const SELECTOR_POLL: Duration = Duration::from_millis(250);

/// Installs a browser when none is present on the machine
#[async_trait]
pub trait BrowserInstaller: Send + Sync {
    /// Returns the path of the installed browser executable
    async fn install(&self) -> Result<PathBuf, String>;
}

/// Downloads a Chromium build into a local folder
#[derive(Debug, Clone)]
pub struct ChromiumDownloader {
    dir: PathBuf,
}

impl ChromiumDownloader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl BrowserInstaller for ChromiumDownloader {
    async fn install(&self) -> Result<PathBuf, String> {
        tracing::info!("Downloading Chromium into {}", self.dir.display());
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| format!("cannot create {}: {}", self.dir.display(), e))?;

        let options = BrowserFetcherOptions::builder()
            .with_path(&self.dir)
            .build()
            .map_err(|e| e.to_string())?;
        let installation = ChromiumFetcher::new(options)
            .fetch()
            .await
            .map_err(|e| e.to_string())?;

        tracing::info!(
            "Chromium installed at {}",
            installation.executable_path.display()
        );
        Ok(installation.executable_path)
    }
}

/// Picks the browser executable to launch
///
/// Order: the configured binary (which must exist), then `candidates` on
/// PATH, then `installer` when auto-install is enabled.
///
/// # Returns
///
/// * `Ok(PathBuf)` - A browser executable was found or installed
/// * `Err(WeaveError::ToolUnavailable)` - Nothing found and installing failed or is disabled
pub async fn resolve_executable(
    config: &BrowserConfig,
    candidates: &[&str],
    installer: &dyn BrowserInstaller,
) -> Result<PathBuf, WeaveError> {
    if let Some(configured) = &config.binary {
        let path = PathBuf::from(configured);
        if !path.is_file() {
            return Err(WeaveError::ToolUnavailable {
                tool: configured.clone(),
                reason: "configured browser binary does not exist".to_string(),
            });
        }
        return Ok(path);
    }

    if let Some(found) = candidates.iter().find_map(|name| find_on_path(name)) {
        return Ok(found);
    }

    if !config.auto_install {
        return Err(WeaveError::ToolUnavailable {
            tool: TOOL_NAME.to_string(),
            reason: format!(
                "none of {} found on PATH and auto-install is disabled",
                candidates.join(", ")
            ),
        });
    }

    tracing::warn!("No browser found on PATH; installing one");
    installer
        .install()
        .await
        .map_err(|reason| WeaveError::ToolUnavailable {
            tool: TOOL_NAME.to_string(),
            reason: format!("automatic install failed: {}", reason),
        })
}

/// `FetchPort` that renders pages in a headless browser
pub struct BrowserFetcher {
    browser: Browser,
    handler: JoinHandle<()>,
    executable: PathBuf,
    timeout: Duration,
    wait_selector: Option<String>,
}

impl BrowserFetcher {
    /// Finds (or installs) a browser and launches it
    pub async fn launch(
        config: &BrowserConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, WeaveError> {
        let installer = ChromiumDownloader::new(config.install_dir());
        let executable = resolve_executable(config, BROWSER_CANDIDATES, &installer).await?;
        Self::launch_executable(executable, config, user_agent).await
    }

    /// Launches a known browser executable
    pub async fn launch_executable(
        executable: PathBuf,
        config: &BrowserConfig,
        user_agent: &UserAgentConfig,
    ) -> Result<Self, WeaveError> {
        let unavailable = |reason: String| WeaveError::ToolUnavailable {
            tool: executable.display().to_string(),
            reason,
        };

        let cdp_config = CdpConfig::builder()
            .chrome_executable(&executable)
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg(format!("--user-agent={}", user_agent.header_value()))
            .request_timeout(config.navigation_timeout())
            .build()
            .map_err(unavailable)?;

        let (browser, mut events) = Browser::launch(cdp_config)
            .await
            .map_err(|e| unavailable(format!("launch failed: {}", e)))?;

        // The CDP connection only makes progress while its event stream is polled
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser event error: {}", e);
                }
            }
        });

        tracing::info!("Using headless browser at {}", executable.display());
        Ok(Self {
            browser,
            handler,
            executable,
            timeout: config.navigation_timeout(),
            wait_selector: config.wait_selector.clone(),
        })
    }

    /// The browser executable in use
    pub fn executable(&self) -> &Path {
        &self.executable
    }

    async fn render(&self, url: &str) -> Result<String, String> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| format!("failed to open page: {}", e))?;

        let html = match tokio::time::timeout(self.timeout, self.capture(&page, url)).await {
            Ok(result) => result,
            Err(_) => Err(format!("navigation timed out after {:?}", self.timeout)),
        };

        if let Err(e) = page.close().await {
            tracing::debug!("Failed to close page for {}: {}", url, e);
        }
        html
    }

    async fn capture(&self, page: &Page, url: &str) -> Result<String, String> {
        page.goto(url)
            .await
            .map_err(|e| format!("navigation failed: {}", e))?;

        if let Some(selector) = &self.wait_selector {
            while page.find_element(selector.as_str()).await.is_err() {
                tokio::time::sleep(SELECTOR_POLL).await;
            }
        }

        let html = page
            .content()
            .await
            .map_err(|e| format!("failed to read DOM: {}", e))?;
        if html.trim().is_empty() {
            return Err("browser produced no DOM".to_string());
        }
        Ok(html)
    }
}

impl Drop for BrowserFetcher {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

#[async_trait]
impl FetchPort for BrowserFetcher {
    fn strategy(&self) -> FetchStrategy {
        FetchStrategy::Browser
    }

    async fn fetch(&self, url: &str) -> Option<String> {
        match self.render(url).await {
            Ok(html) => {
                tracing::debug!("Browser visiting: {}", url);
                Some(html)
            }
            Err(e) => {
                tracing::warn!("Browser failed to visit {}: {}", url, e);
                None
            }
        }
    }
}

/// Searches each PATH entry for an executable file named `name`
fn find_on_path(name: &str) -> Option<PathBuf> {
    let paths = std::env::var_os("PATH")?;
    std::env::split_paths(&paths)
        .map(|dir| dir.join(name))
        .find(|candidate| candidate.is_file())
}
