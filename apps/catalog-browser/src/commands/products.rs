//! # Product List Commands
//!
//! `browse` and `categories`, both backed by [`BrowserController`].
//!
//! ## Browse Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    catalog-browser browse                               │
//! │                                                                         │
//! │  --sort parsed ──► invalid? exit 2 before any request                  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  initialize() ──► failed + --retry? ──► retry_initialize()             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  --category? ──► filter_by_category(label)                             │
//! │                    failed + --retry? ──► retry_last_filter()           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sort_products(--sort or configured default)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  render cards (or JSON snapshot); error set ──► exit 1                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::io::Write;

use catalog_api::CatalogApi;
use catalog_core::format::card_line;
use catalog_core::{BrowseState, SortKey};
use tracing::{info, warn};

use super::{write_json, OutputFormat};
use crate::error::{AppError, AppResult};
use crate::state::BrowserController;

/// Arguments of the `browse` subcommand.
#[derive(Debug, Clone, Default)]
pub struct BrowseOptions {
    /// Display label (or slug) to filter by.
    pub category: Option<String>,
    /// Raw sort key such as `price-desc`.
    pub sort: Option<String>,
    /// Retry once when a request fails.
    pub retry: bool,
    pub format: OutputFormat,
}

/// Lists products, optionally filtered and sorted.
pub async fn browse<C: CatalogApi>(
    controller: &BrowserController<C>,
    options: &BrowseOptions,
    out: &mut impl Write,
) -> AppResult<()> {
    let sort = options
        .sort
        .as_deref()
        .map(str::parse::<SortKey>)
        .transpose()?;

    controller.initialize().await;
    if options.retry && controller.snapshot().error.is_some() {
        warn!("initial load failed, retrying once");
        controller.retry_initialize().await;
    }

    if let Some(ref category) = options.category {
        if controller.snapshot().error.is_none() {
            controller.filter_by_category(category).await;
            if options.retry && controller.snapshot().error.is_some() {
                warn!(category = %category, "filter failed, retrying once");
                controller.retry_last_filter().await;
            }
        }
    }

    let key = sort.unwrap_or_else(|| controller.snapshot().sort_by);
    controller.sort_products(key);

    let state = controller.snapshot();
    match options.format {
        OutputFormat::Json => write_json(out, &state)?,
        OutputFormat::Text => render_products(&state, out)?,
    }

    match state.error {
        Some(message) => Err(AppError::Fetch(message)),
        None => {
            info!(products = state.products.len(), "browse complete");
            Ok(())
        }
    }
}

/// Lists the categories as `label (slug)`.
pub async fn categories<C: CatalogApi>(
    controller: &BrowserController<C>,
    retry: bool,
    format: OutputFormat,
    out: &mut impl Write,
) -> AppResult<()> {
    controller.initialize().await;
    if retry && controller.snapshot().error.is_some() {
        controller.retry().await;
    }

    let state = controller.snapshot();
    if let Some(message) = state.error {
        return Err(AppError::Fetch(message));
    }

    match format {
        OutputFormat::Json => write_json(out, &state.category_index)?,
        OutputFormat::Text => {
            if state.category_index.is_empty() {
                writeln!(out, "No categories")?;
            }
            for category in &state.category_index {
                writeln!(out, "{} ({})", category.label, category.slug)?;
            }
        }
    }
    Ok(())
}

/// Renders the product list screen as text.
pub fn render_products(state: &BrowseState, out: &mut impl Write) -> AppResult<()> {
    let category = if state.active_category.is_empty() {
        "All"
    } else {
        state.active_category.as_str()
    };
    writeln!(
        out,
        "Category: {} | Sort: {} | {}",
        category,
        state.sort_by.label(),
        product_count(state.products.len())
    )?;

    if let Some(ref message) = state.error {
        writeln!(out, "Error: {}", message)?;
    }

    for product in &state.products {
        writeln!(out, "  [{}] {}", product.id, card_line(product))?;
    }
    Ok(())
}

fn product_count(count: usize) -> String {
    match count {
        1 => "1 product".to_string(),
        n => format!("{} products", n),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use catalog_api::{BrowseSettings, CatalogError, MockCall, MockCatalog};
    use catalog_core::{CategoryLabel, CoreError, Product, ProductsResponse};

    fn product(id: u64, title: &str, price: f64, rating: f64) -> Product {
        Product {
            id,
            title: title.to_string(),
            price,
            thumbnail: String::new(),
            description: String::new(),
            brand: String::new(),
            category: "beauty".to_string(),
            stock: 1,
            rating,
        }
    }

    fn mock() -> Arc<MockCatalog> {
        Arc::new(
            MockCatalog::new()
                .with_products(Ok(ProductsResponse {
                    products: vec![
                        product(1, "Mascara", 9.99, 4.9),
                        product(2, "Eyeshadow", 19.99, 3.2),
                    ],
                    total: 2,
                }))
                .with_categories(Ok(vec![CategoryLabel {
                    slug: "skin-care".to_string(),
                    label: "Skin care".to_string(),
                }])),
        )
    }

    fn controller(mock: &Arc<MockCatalog>) -> BrowserController<MockCatalog> {
        BrowserController::new(Arc::clone(mock), BrowseSettings::default())
    }

    fn output(buf: Vec<u8>) -> String {
        String::from_utf8(buf).unwrap()
    }

    #[tokio::test]
    async fn test_browse_renders_sorted_cards() {
        let mock = mock();
        let mut buf = Vec::new();

        browse(&controller(&mock), &BrowseOptions::default(), &mut buf)
            .await
            .unwrap();

        assert_eq!(
            output(buf),
            "Category: All | Sort: Name (A-Z) | 2 products\n\
             \x20 [2] Eyeshadow · $19.99 · ★3.2\n\
             \x20 [1] Mascara · $9.99 · ★4.9\n"
        );
    }

    #[tokio::test]
    async fn test_browse_with_sort_option() {
        let mock = mock();
        let mut buf = Vec::new();
        let options = BrowseOptions {
            sort: Some("rating-desc".to_string()),
            ..Default::default()
        };

        browse(&controller(&mock), &options, &mut buf).await.unwrap();

        let text = output(buf);
        assert!(text.starts_with("Category: All | Sort: Rating (High to Low)"));
        let mascara = text.find("Mascara").unwrap();
        let eyeshadow = text.find("Eyeshadow").unwrap();
        assert!(mascara < eyeshadow);
    }

    #[tokio::test]
    async fn test_invalid_sort_fails_before_requesting() {
        let mock = mock();
        let options = BrowseOptions {
            sort: Some("popularity".to_string()),
            ..Default::default()
        };

        let err = browse(&controller(&mock), &options, &mut Vec::new())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            AppError::InvalidInput(CoreError::UnknownSortKey(_))
        ));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_browse_filters_by_label() {
        let mock = mock();
        mock.set_category(
            "skin-care",
            Ok(ProductsResponse {
                products: vec![product(9, "Serum", 14.5, 4.0)],
                total: 1,
            }),
        );
        let options = BrowseOptions {
            category: Some("Skin care".to_string()),
            ..Default::default()
        };
        let mut buf = Vec::new();

        browse(&controller(&mock), &options, &mut buf).await.unwrap();

        let text = output(buf);
        assert!(text.starts_with("Category: Skin care | Sort: Name (A-Z) | 1 product\n"));
        assert!(text.contains("[9] Serum · $14.50 · ★4.0"));
    }

    #[tokio::test]
    async fn test_browse_failure_renders_error_and_fails() {
        let mock = Arc::new(MockCatalog::new().with_products(Err(CatalogError::Network)));
        let mut buf = Vec::new();

        let err = browse(&controller(&mock), &BrowseOptions::default(), &mut buf)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Network error: Unable to connect to the server");
        assert!(output(buf).contains("Error: Network error: Unable to connect to the server"));
    }

    #[tokio::test]
    async fn test_browse_retry_flag_retries_once() {
        let mock = Arc::new(MockCatalog::new().with_products(Err(CatalogError::Network)));
        let options = BrowseOptions {
            retry: true,
            ..Default::default()
        };

        let result = browse(&controller(&mock), &options, &mut Vec::new()).await;

        assert!(result.is_err());
        let product_calls = mock
            .calls()
            .into_iter()
            .filter(|c| matches!(c, MockCall::Products { .. }))
            .count();
        assert_eq!(product_calls, 2);
    }

    #[tokio::test]
    async fn test_browse_json_snapshot() {
        let mock = mock();
        let options = BrowseOptions {
            format: OutputFormat::Json,
            ..Default::default()
        };
        let mut buf = Vec::new();

        browse(&controller(&mock), &options, &mut buf).await.unwrap();

        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["products"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["sortBy"], "name-asc");
        assert_eq!(json["loading"], false);
        assert_eq!(json["categories"][0], "Skin care");
    }

    #[tokio::test]
    async fn test_categories_lists_labels_with_slugs() {
        let mock = mock();
        let mut buf = Vec::new();

        categories(&controller(&mock), false, OutputFormat::Text, &mut buf)
            .await
            .unwrap();

        assert_eq!(output(buf), "Skin care (skin-care)\n");
    }

    #[test]
    fn test_product_count_pluralizes() {
        assert_eq!(product_count(0), "0 products");
        assert_eq!(product_count(1), "1 product");
        assert_eq!(product_count(20), "20 products");
    }

    #[test]
    fn test_render_empty_list() {
        let mut buf = Vec::new();
        render_products(&BrowseState::new(), &mut buf).unwrap();
        assert_eq!(output(buf), "Category: All | Sort: Name (A-Z) | 0 products\n");
    }
}
