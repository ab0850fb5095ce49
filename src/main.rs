//! Casafeed main entry point
//!
//! Command-line interface for running one named crawl: select the crawler,
//! crawl to convergence, persist the JSON artifact, and optionally hand it
//! to the upload collaborator.

use std::path::Path;
use std::str::FromStr;

use anyhow::Context;
use chrono::{NaiveDate, Utc};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use casafeed::config::{self, Config};
use casafeed::crawler::Crawler;
use casafeed::output::{self, FsUploader, Uploader};

/// Casafeed: a two-stage real-estate listing crawler
///
/// Crawls a listing site's paginated index, enriches every record from its
/// detail page, and writes the collection as an indented JSON artifact.
#[derive(Parser, Debug)]
#[command(name = "casafeed")]
#[command(version = "1.0.0")]
#[command(about = "Real-estate listing crawler", long_about = None)]
struct Cli {
    /// The crawler to run (e.g. century21_pt)
    #[arg(long)]
    crawler: String,

    /// Reference run date (YYYY-MM-DD); resolves the upload destination.
    /// Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Path to TOML configuration file; built-in defaults when omitted
    #[arg(long)]
    config: Option<std::path::PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    // Resolve the crawler name first: an unknown name aborts before any
    // network activity.
    let crawler = Crawler::from_str(&cli.crawler)?;

    let config = match &cli.config {
        Some(path) => config::load_config(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => Config::default(),
    };

    let run_date = cli.date.unwrap_or_else(|| Utc::now().date_naive());

    let (bot_name, listings) = crawler.crawl(run_date, &config).await?;

    std::fs::create_dir_all(&config.output.directory)
        .with_context(|| format!("creating output directory {}", config.output.directory))?;
    let artifact = Path::new(&config.output.directory).join(format!("{bot_name}.json"));
    output::write_listings(&listings, &artifact)?;

    if config.upload.enabled && !listings.is_empty() {
        let destination = output::resolve_destination(
            &config.upload.destination_template,
            bot_name,
            run_date,
        );
        let uploader = FsUploader::new(&config.upload.archive_dir);

        match uploader.upload(&artifact, &destination).await {
            Ok(()) => {
                // Only a successful upload makes the local copy redundant
                std::fs::remove_file(&artifact)
                    .with_context(|| format!("removing {}", artifact.display()))?;
                tracing::info!(%destination, "uploaded listing artifact");
            }
            Err(err) => {
                tracing::error!(%err, artifact = %artifact.display(),
                    "upload failed, keeping local artifact");
            }
        }
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("casafeed=info,warn"),
            1 => EnvFilter::new("casafeed=debug,info"),
            2 => EnvFilter::new("casafeed=trace,debug"),
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
