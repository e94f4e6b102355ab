//! Docweave main entry point
//!
//! This is the command-line interface for the Docweave corpus builder.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use docweave::config::{load_config_with_hash, Config, OutputFormat};
use docweave::corpus::{clean_corpus, harvest_site};
use docweave::crawler::crawl_site;
use docweave::output::{
    format_clean_summary, format_crawl_summary, format_harvest_summary, format_rewrite_summary,
    MANIFEST_FILE,
};
use docweave::pipeline::{run_pipeline, site_folder};
use docweave::rewrite::rewrite_site;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Docweave: turn a live website into a local corpus of interlinked documents
///
/// Docweave crawls a site breadth-first (escalating from plain HTTP to a
/// headless browser when coverage is too low), harvests the main text of
/// every page, rewrites links into corpus-local references and adds
/// "Related" backlink sections.
#[derive(Parser, Debug)]
#[command(name = "docweave")]
#[command(version)]
#[command(about = "Turn a website into an interlinked document corpus", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Discover every in-scope URL and write urls.txt and sitemap.xml
    Crawl {
        /// Site to crawl
        base_url: String,

        /// Output folder (defaults to a folder named after the domain)
        output_folder: Option<PathBuf>,
    },

    /// Download the main text of every manifest URL into the corpus
    Harvest {
        /// Corpus folder
        folder: PathBuf,

        /// URL manifest (defaults to <folder>/urls.txt)
        #[arg(long)]
        manifest: Option<PathBuf>,
    },

    /// Rewrite links into corpus references and add backlinks
    Rewrite {
        /// Corpus folder
        folder: PathBuf,

        /// Link style: md or html (defaults to the configured format)
        #[arg(long)]
        format: Option<OutputFormat>,
    },

    /// Trim trailing whitespace and remove empty documents and folders
    Clean {
        /// Corpus folder
        folder: PathBuf,
    },

    /// Crawl, harvest, rewrite and clean in one go
    Run {
        /// Site to process
        base_url: String,

        /// Link style: md or html (defaults to the configured format)
        #[arg(long)]
        format: Option<OutputFormat>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load(cli.config.as_deref())?;

    match cli.command {
        Command::Crawl {
            base_url,
            output_folder,
        } => {
            let folder = match output_folder {
                Some(folder) => folder,
                None => site_folder(Path::new("."), &base_url)?,
            };
            let outcome = crawl_site(&config, &base_url, &folder)
                .await
                .with_context(|| format!("Crawl of {} failed", base_url))?;
            print!("{}", format_crawl_summary(&outcome));
        }
        Command::Harvest { folder, manifest } => {
            let manifest = manifest.unwrap_or_else(|| folder.join(MANIFEST_FILE));
            let report = harvest_site(&config, &manifest, &folder)
                .await
                .with_context(|| format!("Harvest from {} failed", manifest.display()))?;
            print!("{}", format_harvest_summary(&report));
        }
        Command::Rewrite { folder, format } => {
            let format = format.unwrap_or(config.rewrite.format);
            let rewrite = rewrite_site(&config, &folder, format)
                .await
                .with_context(|| format!("Rewrite of {} failed", folder.display()))?;
            print!("{}", format_rewrite_summary(&rewrite));
        }
        Command::Clean { folder } => {
            let report = clean_corpus(&folder)
                .with_context(|| format!("Cleaning {} failed", folder.display()))?;
            print!("{}", format_clean_summary(&report));
        }
        Command::Run { base_url, format } => {
            let format = format.unwrap_or(config.rewrite.format);
            let report = run_pipeline(&config, &base_url, Path::new("."), format)
                .await
                .with_context(|| format!("Pipeline for {} failed", base_url))?;

            print!("{}", format_crawl_summary(&report.crawl));
            println!();
            print!("{}", format_harvest_summary(&report.harvest));
            print!("{}", format_rewrite_summary(&report.rewrite));
            print!("{}", format_clean_summary(&report.clean));
            println!("\n✓ Corpus ready in {}", report.folder.display());
        }
    }

    Ok(())
}

/// Loads the configuration file, or the defaults when none is given
fn load(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given; using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docweave=info,warn"),
            1 => EnvFilter::new("docweave=debug,info"),
            2 => EnvFilter::new("docweave=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
