//! # Domain Types
//!
//! Core domain types used throughout the catalog browser.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │    Product      │   │ ProductsResponse │   │  CategoryLabel  │      │
//! │  │  ─────────────  │   │  ──────────────  │   │  ─────────────  │      │
//! │  │  id             │   │  products        │   │  slug (raw)     │      │
//! │  │  title, brand   │   │  total           │   │  label (display)│      │
//! │  │  price, rating  │   └──────────────────┘   └─────────────────┘      │
//! │  │  stock, ...     │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Products are immutable once fetched and replaced wholesale on re-fetch.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};

// =============================================================================
// Product
// =============================================================================

/// Stable catalog identifier of a product.
pub type ProductId = u64;

/// A product as shown on cards and the detail screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique per catalog, stable across fetches.
    #[ts(type = "number")]
    pub id: ProductId,

    pub title: String,

    /// Non-negative decimal price.
    pub price: f64,

    /// URI of the card image.
    pub thumbnail: String,

    pub description: String,

    pub brand: String,

    /// Raw category slug as stored upstream (e.g. `home-decoration`).
    pub category: String,

    #[ts(type = "number")]
    pub stock: i64,

    /// Average rating in [0, 5].
    pub rating: f64,
}

/// Parses a product id typed by a user (CLI argument, deep link).
///
/// ## Example
/// ```rust
/// use catalog_core::types::parse_product_id;
///
/// assert_eq!(parse_product_id(" 5 ").unwrap(), 5);
/// assert!(parse_product_id("five").is_err());
/// ```
pub fn parse_product_id(raw: &str) -> CoreResult<ProductId> {
    raw.trim()
        .parse::<ProductId>()
        .map_err(|_| CoreError::InvalidProductId(raw.to_string()))
}

// =============================================================================
// Products Response
// =============================================================================

/// One page of products.
///
/// `total` may exceed `products.len()` when the upstream page was truncated;
/// it is carried along but not otherwise used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    #[ts(type = "number")]
    pub total: u64,
}

// =============================================================================
// Category Label
// =============================================================================

/// A category as offered by the filter bar.
///
/// Labels are derived from slugs and are not guaranteed unique, so the slug
/// is kept alongside for the category-scoped request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CategoryLabel {
    /// Opaque upstream identifier (`beauty-products`).
    pub slug: String,
    /// Human-formatted label (`Beauty products`).
    pub label: String,
}

// =============================================================================
// Unit Tests
// =============================================================================
