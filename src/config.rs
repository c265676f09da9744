//! Client configuration
//!
//! Settings for talking to the bank API, loaded from a YAML or JSON file.
//!
//! ```yaml
//! base_url: "https://api.bank.example/v1"
//! account_number: "1234567890"
//! timeout_secs: 30
//! max_retries: 3
//! page_size: 50
//! backoff:
//!   type: exponential
//!   initial_ms: 100
//!   max_ms: 30000
//! headers:
//!   X-Channel: sdk
//! ```

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::pagination::{Page, DEFAULT_PAGE_SIZE};
use crate::types::{BackoffType, StringMap};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use url::Url;

// ============================================================================
// Client Config
// ============================================================================

/// Complete client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the bank API
    pub base_url: String,

    /// Account used when a command does not name one
    #[serde(default)]
    pub account_number: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Maximum number of retries per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Page size used when iterating statements
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Overrides the default user agent
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Headers sent with every request
    #[serde(default)]
    pub headers: StringMap,

    /// Retry backoff
    #[serde(default)]
    pub backoff: BackoffConfig,
}

fn default_timeout() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    30000
}

impl ClientConfig {
    /// Create a config with defaults for everything but the base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            account_number: None,
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            page_size: default_page_size(),
            user_agent: None,
            headers: StringMap::new(),
            backoff: BackoffConfig::default(),
        }
    }

    /// Load and validate a config file
    ///
    /// `.json` files are read as JSON, anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;

        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_yaml_str(&content)
        }
    }

    /// Parse and validate a YAML config
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field for values the client cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.base_url.trim().is_empty() {
            return Err(Error::missing_field("base_url"));
        }

        let url = Url::parse(&self.base_url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_config(
                "base_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(Error::invalid_config("timeout_secs", "must be at least 1"));
        }

        Page::first(i64::from(self.page_size))
            .map_err(|e| Error::invalid_config("page_size", e.to_string()))?;

        if self.backoff.initial_ms > self.backoff.max_ms {
            return Err(Error::invalid_config(
                "backoff",
                "initial_ms must not exceed max_ms",
            ));
        }

        if let Some(account) = &self.account_number {
            if account.trim().is_empty() {
                return Err(Error::invalid_config("account_number", "must not be empty"));
            }
        }

        Ok(())
    }

    /// HTTP client settings derived from this config
    pub fn http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff.backoff_type,
                Duration::from_millis(self.backoff.initial_ms),
                Duration::from_millis(self.backoff.max_ms),
            );

        for (key, value) in &self.headers {
            builder = builder.header(key, value);
        }
        if let Some(agent) = &self.user_agent {
            builder = builder.user_agent(agent);
        }

        builder.build()
    }

    /// First page window for statement iteration
    pub fn initial_page(&self) -> Result<Page> {
        Page::first(i64::from(self.page_size))
    }
}
