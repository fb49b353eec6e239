//! # App Error Type
//!
//! Failures that end a CLI invocation.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Catalog Browser                    │
//! │                                                                         │
//! │  CatalogConfig::load ── CatalogError::Config ─────┐                     │
//! │                                                   │                     │
//! │  "abc".parse::<ProductId>() ── CoreError ─────────┼──► AppError ──► exit│
//! │                                                   │                     │
//! │  Controller settled with `error` set ─────────────┘                     │
//! │                                                                         │
//! │  Fetch failures never reach here as `CatalogError`: the controllers    │
//! │  store the message in their state. The command reads it back and      │
//! │  raises `AppError::Fetch` so the exit code reflects the outcome.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io;
use std::process::ExitCode;

use catalog_api::CatalogError;
use catalog_core::CoreError;
use serde::Serialize;
use thiserror::Error;

/// Result type for CLI commands.
pub type AppResult<T> = Result<T, AppError>;

/// A failed CLI invocation.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or the client could not be built.
    #[error("{0}")]
    Config(CatalogError),

    /// A controller settled with an error message.
    #[error("{0}")]
    Fetch(String),

    /// User input was rejected before anything was requested.
    #[error(transparent)]
    InvalidInput(#[from] CoreError),

    /// Writing the output failed.
    #[error("Output error: {0}")]
    Io(#[from] io::Error),
}

/// Machine-readable error codes for `--json` output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ConfigError,
    FetchFailed,
    ValidationError,
    Internal,
}

/// JSON shape of an [`AppError`].
///
/// ```json
/// { "code": "FETCH_FAILED", "message": "API Error: 404 - Not Found" }
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub message: String,
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Config(_) => ErrorCode::ConfigError,
            AppError::Fetch(_) => ErrorCode::FetchFailed,
            AppError::InvalidInput(_) => ErrorCode::ValidationError,
            AppError::Io(_) => ErrorCode::Internal,
        }
    }

    /// Process exit status: 1 for failed fetches, 2 for bad input or config.
    pub fn exit_code(&self) -> ExitCode {
        match self.code() {
            ErrorCode::FetchFailed | ErrorCode::Internal => ExitCode::from(1),
            ErrorCode::ConfigError | ErrorCode::ValidationError => ExitCode::from(2),
        }
    }

    pub fn body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            message: self.to_string(),
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::Config(_) => AppError::Config(err),
            other => AppError::Fetch(other.to_string()),
        }
    }
}
