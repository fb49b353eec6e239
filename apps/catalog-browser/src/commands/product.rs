//! # Product Detail Command
//!
//! `show <id>`, backed by [`ViewerController`].

use std::io::Write;

use catalog_api::CatalogApi;
use catalog_core::format::{format_price, format_rating, stock_label};
use catalog_core::mapper::format_category_label;
use catalog_core::ViewerState;
use tracing::warn;

use super::{write_json, OutputFormat};
use crate::error::{AppError, AppResult};
use crate::state::ViewerController;

/// Loads one product and renders the detail screen.
pub async fn show<C: CatalogApi>(
    viewer: &ViewerController<C>,
    retry: bool,
    format: OutputFormat,
    out: &mut impl Write,
) -> AppResult<()> {
    viewer.activate().await;
    if retry && viewer.snapshot().error.is_some() {
        warn!(product_id = viewer.snapshot().product_id, "product load failed, retrying once");
        viewer.retry().await;
    }

    let state = viewer.snapshot();
    match format {
        OutputFormat::Json => write_json(out, &state)?,
        OutputFormat::Text => render_product(&state, out)?,
    }

    match state.error {
        Some(message) => Err(AppError::Fetch(message)),
        None => Ok(()),
    }
}

/// Renders the product detail screen as text.
pub fn render_product(state: &ViewerState, out: &mut impl Write) -> AppResult<()> {
    let product = match (&state.product, &state.error) {
        (Some(product), _) => product,
        (None, Some(message)) => {
            writeln!(out, "Product {}: {}", state.product_id, message)?;
            return Ok(());
        }
        (None, None) => {
            writeln!(out, "Product {}: not loaded", state.product_id)?;
            return Ok(());
        }
    };

    let category = format_category_label(&product.category)
        .unwrap_or_else(|| product.category.clone());

    writeln!(out, "{}", product.title)?;
    if !product.brand.is_empty() {
        writeln!(out, "  Brand:    {}", product.brand)?;
    }
    writeln!(out, "  Category: {}", category)?;
    writeln!(out, "  Price:    {}", format_price(product.price))?;
    writeln!(out, "  Rating:   ★{}", format_rating(product.rating))?;
    writeln!(out, "  Stock:    {}", stock_label(product.stock))?;
    if !product.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", product.description)?;
    }
    if !product.thumbnail.is_empty() {
        writeln!(out, "Image: {}", product.thumbnail)?;
    }
    Ok(())
}
