//! Account statement module
//!
//! Transactions of an account over a booking-date range, paged through
//! the lazy pagination engine.
//!
//! # Overview
//!
//! - `Transaction` / `StatementPage` - tolerant parsing of statement payloads
//! - `StatementQuery` - account and booking-date range
//! - `StatementClient` - HTTP fetcher plus a lazy transaction stream

mod client;
mod types;

pub use client::{StatementClient, StatementFetcher};
pub use types::{
    parse_date, StatementPage, StatementQuery, Transaction, TransactionType, DEFAULT_CURRENCY,
};

#[cfg(test)]
mod tests;
