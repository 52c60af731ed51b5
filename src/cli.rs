//! Command-line interface definitions for the news collector.
//!
//! Every option has a default, so a bare invocation crawls all built-in
//! sources into `./data`.

use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for the news collector.
///
/// # Examples
///
/// ```sh
/// # Crawl every built-in source, 200 articles per category
/// haber_toplayici
///
/// # Only NTV and Habertürk, smaller target
/// haber_toplayici --source ntv --source haberturk -n 50
///
/// # Rebuild the combined dataset from existing per-source files
/// haber_toplayici --combine-only
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Articles to collect per category and source
    #[arg(short = 'n', long, env = "TARGET_PER_CATEGORY", default_value_t = 200)]
    pub target_per_category: usize,

    /// Root directory for `raw/` and `processed/` datasets
    #[arg(short, long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Restrict the run to these sources (repeatable)
    #[arg(short, long = "source")]
    pub sources: Vec<String>,

    /// YAML file of site profiles replacing the built-in set
    #[arg(short, long)]
    pub profiles: Option<PathBuf>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Skip crawling; only combine existing per-source datasets
    #[arg(long)]
    pub combine_only: bool,
}
