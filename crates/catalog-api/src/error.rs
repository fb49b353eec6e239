//! # Catalog Error Types
//!
//! Classification of everything that can go wrong while talking to the
//! catalog.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Catalog Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────────┐  ┌─────────────────────┐  ┌─────────────────┐ │
//! │  │  Server             │  │  Network            │  │  Request        │ │
//! │  │                     │  │                     │  │                 │ │
//! │  │  Response arrived   │  │  No response:       │  │  Anything else: │ │
//! │  │  with a non-2xx     │  │  connect refused,   │  │  bad body, bad  │ │
//! │  │  status             │  │  DNS, timeout       │  │  URL, decode    │ │
//! │  └─────────────────────┘  └─────────────────────┘  └─────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────────┐                                               │
//! │  │  Config             │  Not a fetch error: raised while loading or   │
//! │  │                     │  validating catalog.toml                      │
//! │  └─────────────────────┘                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The `Display` text of each variant is exactly what controllers put into
//! their `error` field.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog error type covering all request failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The server responded with a non-2xx status.
    #[error("API Error: {status} - {status_text}")]
    Server { status: u16, status_text: String },

    /// No response was received.
    #[error("Network error: Unable to connect to the server")]
    Network,

    /// Any other failure while building, sending or decoding a request.
    #[error("Request error: {0}")]
    Request(String),

    /// Invalid client configuration.
    #[error("Invalid catalog configuration: {0}")]
    Config(String),
}

impl CatalogError {
    /// Builds a [`CatalogError::Server`] from a response status.
    pub fn from_status(status: StatusCode) -> Self {
        CatalogError::Server {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    /// HTTP status, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            CatalogError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns true if trying the same request again may succeed.
    ///
    /// ## Retryable Errors
    /// - Network failures (no response)
    /// - 5xx and 429 responses
    pub fn is_retryable(&self) -> bool {
        match self {
            CatalogError::Network => true,
            CatalogError::Server { status, .. } => *status >= 500 || *status == 429,
            CatalogError::Request(_) | CatalogError::Config(_) => false,
        }
    }
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for CatalogError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            CatalogError::from_status(status)
        } else if err.is_connect() || err.is_timeout() || err.is_request() {
            CatalogError::Network
        } else {
            CatalogError::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(err: serde_json::Error) -> Self {
        CatalogError::Request(err.to_string())
    }
}

impl From<std::io::Error> for CatalogError {
    fn from(err: std::io::Error) -> Self {
        CatalogError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for CatalogError {
    fn from(err: toml::de::Error) -> Self {
        CatalogError::Config(err.to_string())
    }
}
