//! # Sort Comparator
//!
//! Client-side ordering of the product list held in memory.
//!
//! ## Sort Keys
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Key            Field    Direction   Comparison                         │
//! │  ─────────────  ───────  ──────────  ─────────────────────────────────  │
//! │  name-asc       title    ascending   locale-aware, case-insensitive     │
//! │  name-desc      title    descending  locale-aware, case-insensitive     │
//! │  price-asc      price    ascending   numeric                            │
//! │  price-desc     price    descending  numeric                            │
//! │  rating-asc     rating   ascending   numeric                            │
//! │  rating-desc    rating   descending  numeric                            │
//! │                                                                         │
//! │  unknown key  ──► identity order (raw-key entry point only)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Sorting never mutates its input and is stable: ties keep their relative
//! order, so a descending sort is not a plain reversal of the ascending one
//! when tie groups exist.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;
use crate::types::Product;

// =============================================================================
// Sort Key
// =============================================================================

/// One of the six supported orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
    RatingAsc,
    RatingDesc,
}

impl SortKey {
    /// All keys in sort-picker order.
    pub const ALL: [SortKey; 6] = [
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::PriceAsc,
        SortKey::PriceDesc,
        SortKey::RatingAsc,
        SortKey::RatingDesc,
    ];

    /// Wire form (`price-asc`).
    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::PriceAsc => "price-asc",
            SortKey::PriceDesc => "price-desc",
            SortKey::RatingAsc => "rating-asc",
            SortKey::RatingDesc => "rating-desc",
        }
    }

    /// Label shown by the sort picker.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::NameAsc => "Name (A-Z)",
            SortKey::NameDesc => "Name (Z-A)",
            SortKey::PriceAsc => "Price (Low to High)",
            SortKey::PriceDesc => "Price (High to Low)",
            SortKey::RatingAsc => "Rating (Low to High)",
            SortKey::RatingDesc => "Rating (High to Low)",
        }
    }

    fn compare(&self, a: &Product, b: &Product) -> Ordering {
        match self {
            SortKey::NameAsc => locale_compare(&a.title, &b.title),
            SortKey::NameDesc => locale_compare(&b.title, &a.title),
            SortKey::PriceAsc => a.price.total_cmp(&b.price),
            SortKey::PriceDesc => b.price.total_cmp(&a.price),
            SortKey::RatingAsc => a.rating.total_cmp(&b.rating),
            SortKey::RatingDesc => b.rating.total_cmp(&a.rating),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| CoreError::UnknownSortKey(s.to_string()))
    }
}

// =============================================================================
// Comparator
// =============================================================================

/// Compares two titles the way a user-facing list expects.
///
/// Case differences only matter when the titles are otherwise equal, and
/// then lowercase sorts first. Byte order breaks the remaining ties so the
/// result is a total order.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    let folded = |s: &str| s.chars().flat_map(char::to_lowercase).collect::<Vec<_>>();

    folded(a)
        .cmp(&folded(b))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

/// Returns a new list ordered by `key`. The input is left untouched.
pub fn sort_products(products: &[Product], key: SortKey) -> Vec<Product> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| key.compare(a, b));
    sorted
}

/// Like [`sort_products`], but takes the key in wire form.
///
/// An unknown key returns the products in their current order.
pub fn sort_products_by_raw_key(products: &[Product], key: &str) -> Vec<Product> {
    match key.parse::<SortKey>() {
        Ok(key) => sort_products(products, key),
        Err(_) => products.to_vec(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
