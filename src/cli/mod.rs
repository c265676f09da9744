//! CLI module
//!
//! Command-line interface for reading account statements.
//!
//! # Commands
//!
//! - `statements` - Stream every transaction in a date range
//! - `page` - Fetch one page with its paging metadata
//! - `validate` - Check the configuration file

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat, QueryArgs};
pub use runner::Runner;
