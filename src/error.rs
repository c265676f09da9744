//! Error types for the bank SDK
//!
//! This module defines the error hierarchy for the whole SDK.
//! All public APIs return `Result<T, Error>` where Error is defined here,
//! except the pagination engine which propagates its fetcher's own error type.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The main error type for the bank SDK
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Argument Errors
    // ============================================================================
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("API error {code} ({kind:?}, HTTP {status}): {message}")]
    Api {
        status: u16,
        kind: ApiErrorKind,
        code: String,
        message: String,
    },

    #[error("Rate limited, retry after {retry_after_seconds}s")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Max retries ({max_retries}) exceeded")]
    MaxRetriesExceeded { max_retries: u32 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an invalid argument error
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create a classified API error from a normalized error body
    pub fn api(status: u16, error: ApiError) -> Self {
        Self::Api {
            status,
            kind: ApiErrorKind::classify(Some(&error.code), Some(status)),
            code: error.code,
            message: error.message,
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Kind of API failure, if this error came from the bank API
    pub fn api_kind(&self) -> Option<ApiErrorKind> {
        match self {
            Error::Api { kind, .. } => Some(*kind),
            Error::HttpStatus { status, .. } => Some(ApiErrorKind::classify(None, Some(*status))),
            Error::Timeout { .. } => Some(ApiErrorKind::Timeout),
            _ => None,
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(_) | Error::RateLimited { .. } | Error::Timeout { .. } => true,
            Error::HttpStatus { status, .. } | Error::Api { status, .. } => {
                is_retryable_status(*status)
            }
            _ => false,
        }
    }
}

/// Check if an HTTP status code is retryable
fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500 | 502 | 503 | 504)
}

// ============================================================================
// API Error Classification
// ============================================================================

/// Category of a failure reported by the bank API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiErrorKind {
    InvalidRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    Timeout,
    Conflict,
    ServerError,
    InsufficientFunds,
    DuplicateTransaction,
    InvalidAccount,
    Unknown,
}

impl ApiErrorKind {
    /// Classify a failure. Business error codes win over the HTTP status.
    pub fn classify(code: Option<&str>, status: Option<u16>) -> Self {
        match code {
            Some("INSUFFICIENT_FUNDS") => return Self::InsufficientFunds,
            Some("DUPLICATE_TRANSACTION") => return Self::DuplicateTransaction,
            Some("INVALID_ACCOUNT") => return Self::InvalidAccount,
            _ => {}
        }

        match status {
            Some(s) if s >= 500 => Self::ServerError,
            Some(400) => Self::InvalidRequest,
            Some(401) => Self::Unauthorized,
            Some(403) => Self::Forbidden,
            Some(404) => Self::NotFound,
            Some(408) => Self::Timeout,
            Some(409) => Self::Conflict,
            _ => Self::Unknown,
        }
    }
}

/// Normalized error body returned by the bank API
///
/// Endpoints disagree on field names (`errorCode`/`errorMessage`,
/// `responseCode`/`responseMessage`, legacy `ResultCode`/`ResultDesc`),
/// so the first present alias wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl ApiError {
    /// Normalize an error body. Returns `None` for non-object bodies.
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        let first = |keys: &[&str]| {
            keys.iter()
                .find_map(|k| map.get(*k).and_then(scalar_to_string))
        };

        let code = first(&["errorCode", "code", "responseCode", "ResultCode", "resultCode"])
            .unwrap_or_else(|| "UNKNOWN".to_string());
        let message = first(&[
            "errorMessage",
            "message",
            "responseMessage",
            "ResultDesc",
            "resultDesc",
            "ErrorMessage",
        ])
        .unwrap_or_else(|| "Unknown error".to_string());
        let detail = first(&["detail"]);

        Some(Self {
            code: code.trim().to_string(),
            message: message.trim().to_string(),
            detail: detail.map(|d| d.trim().to_string()),
        })
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Result type alias for the bank SDK
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
