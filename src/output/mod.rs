//! Output module for crawl artifacts and stage summaries
//!
//! This module handles:
//! - The URL manifest (`urls.txt`) the crawl stage writes and later stages read
//! - The equivalent `sitemap.xml`
//! - Formatting summaries of each pipeline stage

mod manifest;
mod sitemap;
mod summary;

pub use manifest::{read_manifest, write_manifest, MANIFEST_FILE};
pub use sitemap::{read_sitemap, render_sitemap, write_sitemap, SITEMAP_FILE};
pub use summary::{
    format_clean_summary, format_crawl_summary, format_harvest_summary, format_rewrite_summary,
};
