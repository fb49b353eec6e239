//! # Response Mapper
//!
//! Translates raw catalog API shapes into the domain model.
//!
//! ## Mapping Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Response Mapping                                │
//! │                                                                         │
//! │  GET /products ──────► ApiProductsResponse ──► map_products_response   │
//! │                          products[]              └─► ProductsResponse   │
//! │                          total, skip, limit                             │
//! │                                                                         │
//! │  GET /products/{id} ─► ApiProduct ───────────► map_product ─► Product   │
//! │                          discountPercentage,     (extra fields dropped) │
//! │                          images, ...                                    │
//! │                                                                         │
//! │  GET /products/categories ─► serde_json::Value ─► map_category_labels   │
//! │                               (anything)           └─► (slug, label)[]  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is total: well-typed input never produces an error.
//! The categories payload is accepted as an untyped JSON value because the
//! upstream shape is not trusted; anything that is not an array maps to an
//! empty list and bad entries are skipped one at a time.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{CategoryLabel, Product, ProductId, ProductsResponse};

// =============================================================================
// API Shapes
// =============================================================================

/// A product exactly as the catalog API sends it.
///
/// Text fields the upstream sometimes omits (`brand` on groceries, for one)
/// default to the empty string instead of failing the whole page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiProduct {
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub discount_percentage: f64,
    #[serde(default)]
    pub rating: f64,
    #[serde(default)]
    pub stock: i64,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub thumbnail: String,
    #[serde(default)]
    pub images: Vec<String>,
}

/// One page of products as the catalog API sends it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiProductsResponse {
    pub products: Vec<ApiProduct>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub skip: u64,
    #[serde(default)]
    pub limit: u64,
}

// =============================================================================
// Products
// =============================================================================

/// Projects an API product onto the domain [`Product`].
///
/// Drops `discount_percentage` and `images`. Numeric ranges are not checked.
pub fn map_product(api: ApiProduct) -> Product {
    Product {
        id: api.id,
        title: api.title,
        price: api.price,
        thumbnail: api.thumbnail,
        description: api.description,
        brand: api.brand,
        category: api.category,
        stock: api.stock,
        rating: api.rating,
    }
}

/// Maps every product in order and copies `total` verbatim.
pub fn map_products_response(api: ApiProductsResponse) -> ProductsResponse {
    ProductsResponse {
        products: api.products.into_iter().map(map_product).collect(),
        total: api.total,
    }
}

// =============================================================================
// Categories
// =============================================================================

/// Formats a raw slug for display.
///
/// Uppercases the first character and replaces every hyphen in the rest of
/// the string with a space. Returns `None` when there is nothing to format.
///
/// ## Example
/// ```rust
/// use catalog_core::mapper::format_category_label;
///
/// assert_eq!(format_category_label("mens-shirts").as_deref(), Some("Mens shirts"));
/// assert_eq!(format_category_label(""), None);
/// ```
pub fn format_category_label(slug: &str) -> Option<String> {
    let mut chars = slug.chars();
    let first = chars.next()?;
    Some(format!("{}{}", first.to_uppercase(), chars.as_str().replace('-', " ")))
}

/// Maps a raw categories payload to `(slug, label)` pairs in API order.
///
/// - Not an array: empty list.
/// - `null`, non-string and empty-string entries are skipped.
/// - An entry whose label cannot be formatted keeps its raw slug as label.
pub fn map_category_labels(raw: &Value) -> Vec<CategoryLabel> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(Value::as_str)
        .filter(|slug| !slug.is_empty())
        .map(|slug| CategoryLabel {
            slug: slug.to_string(),
            label: format_category_label(slug).unwrap_or_else(|| slug.to_string()),
        })
        .collect()
}

/// Maps a raw categories payload to display labels in API order.
///
/// Same filtering rules as [`map_category_labels`].
pub fn map_categories(raw: &Value) -> Vec<String> {
    map_category_labels(raw)
        .into_iter()
        .map(|category| category.label)
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
