//! CLI command definitions

use clap::{Parser, ValueEnum};
use snaxel_domain::Source;
use std::path::PathBuf;

/// Output format for search results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Every result of every source
    Full,
    /// Per-source counts and failures
    Summary,
    /// JSON envelope
    Json,
}

impl From<OutputFormat> for snaxel_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => snaxel_domain::OutputFormat::Full,
            OutputFormat::Summary => snaxel_domain::OutputFormat::Summary,
            OutputFormat::Json => snaxel_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for snaxel
#[derive(Parser, Debug)]
#[command(name = "snaxel")]
#[command(author, version, about = "Multi-source search aggregator")]
#[command(long_about = r#"
Snaxel searches several sources at once (web, images, videos, news, books)
and merges the answers into a single result envelope. One failing source
never hides the others, and repeated searches are served from a short-lived
cache.

Configuration files are loaded from (in priority order):
1. SNAXEL_* environment variables (e.g. SNAXEL_CACHE__TTL_SECS=60)
2. --config <path>     Explicit config file
3. ./snaxel.toml       Project-level config
4. ~/.config/snaxel/config.toml   Global config

Example:
  snaxel "rust async runtimes"
  snaxel -s web -s news -n 5 "rust 2024 edition"
  snaxel --all --output summary "ferris"
  snaxel --single images "crab"
  snaxel -i
"#)]
pub struct Cli {
    /// The search query (not required in interactive mode)
    pub query: Option<String>,

    /// Sources to search (can be specified multiple times)
    #[arg(short, long = "source", value_name = "SOURCE")]
    pub sources: Vec<String>,

    /// Search every known source and print a summary line per source
    #[arg(long, conflicts_with_all = ["sources", "single"])]
    pub all: bool,

    /// Query one source directly, bypassing the cache
    #[arg(long, value_name = "SOURCE", conflicts_with = "sources")]
    pub single: Option<Source>,

    /// Maximum results per source (multi-source searches give images twice as many)
    #[arg(short = 'n', long, value_name = "N")]
    pub limit: Option<usize>,

    /// Output format (defaults to [output] format, then "full")
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Start the interactive search prompt
    #[arg(short, long)]
    pub interactive: bool,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}
