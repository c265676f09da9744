//! HTTP client module
//!
//! Provides the HTTP client the statement fetchers run on.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Backoff Strategies**: Constant, linear, and exponential backoff
//! - **Error Normalization**: Bank API error bodies mapped to typed errors

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
