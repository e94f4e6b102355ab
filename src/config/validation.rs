use crate::config::types::{
    BrowserConfig, Config, CrawlerConfig, HarvestConfig, RewriteConfig, UserAgentConfig,
};
use crate::ConfigError;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_user_agent_config(&config.user_agent)?;
    validate_browser_config(&config.browser)?;
    validate_harvest_config(&config.harvest)?;
    validate_rewrite_config(&config.rewrite)?;
    Ok(())
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.request_delay > 60_000 {
        return Err(ConfigError::Validation(format!(
            "request_delay must be <= 60000ms, got {}ms",
            config.request_delay
        )));
    }

    validate_timeout("crawler.fetch_timeout", config.fetch_timeout)?;

    if config.coverage_threshold < 1 {
        return Err(ConfigError::Validation(
            "coverage_threshold must be >= 1".to_string(),
        ));
    }

    if config.http_attempts < 1 || config.http_attempts > 5 {
        return Err(ConfigError::Validation(format!(
            "http_attempts must be between 1 and 5, got {}",
            config.http_attempts
        )));
    }

    Ok(())
}

/// Validates user agent configuration
fn validate_user_agent_config(config: &UserAgentConfig) -> Result<(), ConfigError> {
    // Validate crawler name: non-empty, alphanumeric + hyphens only
    if config.crawler_name.is_empty() {
        return Err(ConfigError::Validation(
            "crawler_name cannot be empty".to_string(),
        ));
    }

    if !config
        .crawler_name
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "crawler_name must contain only alphanumeric characters and hyphens, got '{}'",
            config.crawler_name
        )));
    }

    if config.crawler_version.trim().is_empty() {
        return Err(ConfigError::Validation(
            "crawler_version cannot be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_browser_config(config: &BrowserConfig) -> Result<(), ConfigError> {
    if let Some(binary) = &config.binary {
        if binary.trim().is_empty() {
            return Err(ConfigError::Validation(
                "browser.binary cannot be empty when set".to_string(),
            ));
        }
    }

    if let Some(selector) = &config.wait_selector {
        if selector.trim().is_empty() {
            return Err(ConfigError::Validation(
                "browser.wait_selector cannot be empty when set".to_string(),
            ));
        }
    }

    validate_timeout("browser.navigation_timeout", config.navigation_timeout)
}

fn validate_harvest_config(config: &HarvestConfig) -> Result<(), ConfigError> {
    validate_timeout("harvest.fetch_timeout", config.fetch_timeout)
}

fn validate_rewrite_config(config: &RewriteConfig) -> Result<(), ConfigError> {
    validate_timeout("rewrite.check_timeout", config.check_timeout)?;

    if let Some(label) = &config.self_label {
        if label.trim().is_empty() || label.chars().any(char::is_whitespace) {
            return Err(ConfigError::Validation(format!(
                "rewrite.self_label must be a single non-empty word, got '{}'",
                label
            )));
        }
    }

    Ok(())
}

fn validate_timeout(name: &str, seconds: u64) -> Result<(), ConfigError> {
    if seconds < 1 {
        return Err(ConfigError::Validation(format!(
            "{} must be >= 1 second, got {}",
            name, seconds
        )));
    }
    Ok(())
}
