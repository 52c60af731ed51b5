//! # Haber Toplayıcı
//!
//! Collects labelled Turkish news articles from CNN Türk, NTV and Habertürk
//! into CSV datasets for text classification.
//!
//! ## Features
//!
//! - One generic crawler driven by per-site profiles (built-in or YAML)
//! - Politeness delays before every listing and article request
//! - Cascading title and body extraction with Open-Graph fallbacks
//! - Sub-category and paginated listing traversal when a category runs short
//! - Per-source CSV files, a combined CSV and a JSON distribution summary
//!
//! ## Usage
//!
//! ```sh
//! haber_toplayici --target-per-category 200 --data-dir ./data
//! ```
//!
//! ## Architecture
//!
//! 1. **Listing**: fetch each category page and extract article links
//! 2. **Articles**: fetch and extract each article until the target is met
//! 3. **Expansion**: crawl sub-category or further listing pages if short
//! 4. **Output**: write per-source CSVs, then the combined CSV and summary

use chrono::Local;
use clap::Parser;
use std::error::Error;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod collect;
mod error;
mod fetch;
mod models;
mod outputs;
mod scrapers;
mod utils;

use cli::Cli;
use collect::{Layout, collect_all, combine_existing};
use error::ConfigError;
use fetch::HttpFetcher;
use scrapers::driver::DriverOptions;
use utils::ensure_writable_dir;

#[tokio::main]
#[instrument]
async fn main() -> Result<ExitCode, Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("haber_toplayici starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    if args.target_per_category == 0 {
        error!("Target per category must be at least 1");
        return Err(ConfigError::ZeroTarget.into());
    }

    // Early check: both output dirs must be writable before any crawling
    let layout = Layout::new(&args.data_dir);
    for dir in [&layout.raw_dir, &layout.processed_dir] {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir.display(),
                error = %e,
                "Output directory is not writable (fix perms or choose a different --data-dir)"
            );
            return Err(e.into());
        }
    }

    let produced = if args.combine_only {
        info!("Combining existing source datasets");
        combine_existing(&layout).await?
    } else {
        let profiles = match &args.profiles {
            Some(path) => scrapers::load_profiles(path).await?,
            None => scrapers::builtin(),
        };
        let profiles = scrapers::select(profiles, &args.sources)?;
        info!(
            sources = ?profiles.iter().map(|p| p.name.as_str()).collect::<Vec<_>>(),
            target = args.target_per_category,
            "Starting collection"
        );

        let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
        let options = DriverOptions {
            target_per_category: args.target_per_category,
            collected_on: Local::now().date_naive(),
        };
        let report = collect_all(&profiles, &fetcher, options, &layout).await?;
        if !report.failed.is_empty() {
            info!(failed = ?report.failed, "Some sources produced no dataset");
        }
        report.total
    };

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        records = produced,
        "Execution complete"
    );

    if produced == 0 {
        error!("No records were produced");
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
