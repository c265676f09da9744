//! CLI commands and argument parsing

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Bank SDK command-line client
#[derive(Parser, Debug)]
#[command(name = "bank-sdk")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (YAML or JSON)
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,

    /// API base URL, overrides the config file
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Output format
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Stream every transaction in a booking-date range
    Statements {
        #[command(flatten)]
        query: QueryArgs,

        /// Offset of the first transaction to read
        #[arg(long, default_value = "0")]
        start: i64,

        /// Stop after this many transactions
        #[arg(long)]
        max_records: Option<usize>,
    },

    /// Fetch a single page and print it with its paging metadata
    Page {
        #[command(flatten)]
        query: QueryArgs,

        /// Offset of the page
        #[arg(long, default_value = "0")]
        start: i64,
    },

    /// Validate the configuration file
    Validate,
}

/// Account and date range shared by the statement commands
#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Account number (defaults to `account_number` from the config)
    #[arg(short, long)]
    pub account: Option<String>,

    /// First booking date (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,

    /// Last booking date (YYYY-MM-DD)
    #[arg(long)]
    pub to: Option<String>,

    /// Cover the last N days instead of an explicit range
    #[arg(long, conflicts_with_all = ["from", "to"])]
    pub days: Option<u32>,

    /// Transactions per page (defaults to `page_size` from the config)
    #[arg(long)]
    pub page_size: Option<i64>,
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output (one message per line)
    Json,
    /// Human-readable output
    Pretty,
}
