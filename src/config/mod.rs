//! Configuration module for Docweave
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every section has defaults, so running without a file
//! is equivalent to loading an empty one.
//!
//! # Example
//!
//! ```no_run
//! use docweave::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("docweave.toml")).unwrap();
//! println!("Coverage threshold: {}", config.crawler.coverage_threshold);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    BrowserConfig, Config, CrawlerConfig, HarvestConfig, OutputFormat, RewriteConfig,
    UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::validate;
