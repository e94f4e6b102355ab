//! Docweave: turns a live website into a local corpus of interlinked documents
//!
//! The crate is organised as a strictly sequential pipeline:
//! crawl (breadth-first discovery with tiered escalation) → harvest (fetch and
//! extract text per URL) → rewrite (corpus-local links and backlinks) → clean.

pub mod config;
pub mod corpus;
pub mod crawler;
pub mod output;
pub mod pipeline;
pub mod rewrite;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Docweave operations
#[derive(Debug, Error)]
pub enum WeaveError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    #[error("Crawl found {found} URLs after {attempts} attempts, below the threshold of {threshold}")]
    CoverageNotMet {
        found: usize,
        threshold: usize,
        attempts: usize,
    },

    #[error("Required tool '{tool}' is unavailable: {reason}")]
    ToolUnavailable { tool: String, reason: String },

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::RunState,
        to: state::RunState,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Docweave operations
pub type Result<T> = std::result::Result<T, WeaveError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use crate::config::{Config, OutputFormat};
pub use crate::pipeline::{run_pipeline, PipelineReport};
pub use crate::state::RunState;
pub use crate::url::{domain_to_folder, normalize_url, to_corpus_key, DomainScope};
