//! # Bank SDK
//!
//! Client for a bank REST API, built around lazy offset pagination.
//!
//! ## Features
//!
//! - **Validated paging windows**: `Page` and `PagedResult` share one bounds policy
//! - **Lazy iteration**: `PagedIterator` fetches a page only when the previous one is drained
//! - **Async streams**: `paged_stream` does the same over network fetchers
//! - **Statements**: tolerant transaction parsing and a statement client
//! - **HTTP**: retry with backoff and normalized API errors
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bank_sdk::{ClientConfig, HttpClient, Page, StatementClient, StatementQuery};
//! use futures::TryStreamExt;
//!
//! #[tokio::main]
//! async fn main() -> bank_sdk::Result<()> {
//!     let config = ClientConfig::from_file("bank.yaml")?;
//!     let client = StatementClient::new(HttpClient::with_config(config.http_config())?);
//!
//!     let query = StatementQuery::for_last_days("1234567890", 30)?;
//!     let transactions: Vec<_> = client
//!         .statements(query, config.initial_page()?)
//!         .try_collect()
//!         .await?;
//!
//!     println!("{} transactions", transactions.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │  CLI  (statements / page / validate)                 │
//! └───────────────────────────┬──────────────────────────┘
//!                             │
//! ┌───────────────────────────┴──────────────────────────┐
//! │  Statement client  → AsyncPageFetcher<Transaction>   │
//! └──────────────┬───────────────────────────┬───────────┘
//!                │                           │
//! ┌──────────────┴─────────────┐ ┌───────────┴───────────┐
//! │ Pagination                 │ │ HTTP                  │
//! │ Page / PagedResult         │ │ Retry + backoff       │
//! │ PagedIterator / stream     │ │ API error mapping     │
//! └────────────────────────────┘ └───────────────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the SDK
pub mod error;

/// Common types and type aliases
pub mod types;

/// Offset pagination: windows, results and lazy iteration
pub mod pagination;

/// HTTP client with retry
pub mod http;

/// Account statements
pub mod statement;

/// Client configuration
pub mod config;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{ApiError, ApiErrorKind, Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::ClientConfig;
pub use http::{HttpClient, HttpClientConfig};
pub use pagination::{
    collect_all, paged_stream, AsyncPageFetcher, Page, PageFetcher, PagedIterator, PagedResult,
};
pub use statement::{StatementClient, StatementQuery, Transaction, TransactionType};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
