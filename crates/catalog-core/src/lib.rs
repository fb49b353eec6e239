//! # catalog-core: Pure Logic for the Catalog Browser
//!
//! This crate is the **heart** of the catalog browser. It contains the
//! response mapping, sorting and view-state transitions as pure functions
//! with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Catalog Browser Architecture                        │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (cards, detail, picker)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ snapshots + actions                    │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │        BrowserController / ViewerController (app crate)         │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │                              │                        │
//! │  ┌──────────────▼──────────────┐  ┌────────────▼────────────────────┐  │
//! │  │ ★ catalog-core (THIS CRATE) │  │  catalog-api (HTTP client)      │  │
//! │  │                             │  │                                 │  │
//! │  │  types   mapper   sort      │  │  CatalogApi trait               │  │
//! │  │  state   format   error     │  │  HttpCatalogClient / MockCatalog│  │
//! │  │                             │  │                                 │  │
//! │  │  NO I/O • PURE FUNCTIONS    │  └─────────────────────────────────┘  │
//! │  └─────────────────────────────┘                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ProductsResponse, CategoryLabel)
//! - [`mapper`] - Raw API shapes and their translation into domain types
//! - [`sort`] - The six sort keys and the comparator
//! - [`state`] - Browse/Viewer state and their reducers
//! - [`format`] - Display helpers for prices, ratings and stock
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use catalog_core::mapper::map_categories;
//! use serde_json::json;
//!
//! let labels = map_categories(&json!(["beauty-products", "", null, "home-decor"]));
//! assert_eq!(labels, vec!["Beauty products", "Home decor"]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod mapper;
pub mod sort;
pub mod state;
pub mod types;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult};
pub use sort::{sort_products, sort_products_by_raw_key, SortKey};
pub use state::{BrowseAction, BrowseState, BrowseStatus, ViewAction, ViewStatus, ViewerState};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default page size for the unfiltered product listing.
pub const DEFAULT_PAGE_LIMIT: u32 = 20;

/// Default number of products skipped for the unfiltered listing.
pub const DEFAULT_PAGE_SKIP: u32 = 0;

/// Message used when a failure carries no description of its own.
pub const UNKNOWN_ERROR_MESSAGE: &str = "An unknown error occurred";
