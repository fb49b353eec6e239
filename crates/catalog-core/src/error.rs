//! # Error Types
//!
//! Domain-specific error types for catalog-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  catalog-core errors (this file)                                       │
//! │  └── CoreError        - Parsing failures at the input seams            │
//! │                                                                         │
//! │  catalog-api errors (separate crate)                                   │
//! │  └── CatalogError     - Server / Network / Request failures            │
//! │                                                                         │
//! │  App errors                                                            │
//! │  └── AppError         - What the CLI reports before exiting            │
//! │                                                                         │
//! │  Flow: CatalogError → display string in state → presentation          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A malformed categories payload is not an error here: the
//! mapper degrades it to an empty list.

use thiserror::Error;

/// Core errors raised when parsing user or config input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Sort key is not one of the six known keys.
    ///
    /// Only raised by `SortKey::from_str`. The comparator entry point that
    /// accepts raw keys treats unknown keys as identity order instead.
    #[error("Unknown sort key: '{0}'. Valid options: name-asc, name-desc, price-asc, price-desc, rating-asc, rating-desc")]
    UnknownSortKey(String),

    /// Product id is not a non-negative integer.
    #[error("Invalid product id: '{0}'")]
    InvalidProductId(String),
}

/// Result of a parsing seam in catalog-core.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
