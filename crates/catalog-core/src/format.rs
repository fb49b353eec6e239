//! # Display Formatting
//!
//! Small pure helpers shared by product cards and the detail screen.
//! Prices are decimals on the wire, so formatting rounds to cents here and
//! nowhere else.

use crate::types::Product;

/// Formats a price as dollars with two decimals.
///
/// ## Example
/// ```rust
/// use catalog_core::format::format_price;
///
/// assert_eq!(format_price(12.999), "$13.00");
/// assert_eq!(format_price(-5.5), "-$5.50");
/// ```
pub fn format_price(price: f64) -> String {
    if price < 0.0 {
        format!("-${:.2}", price.abs())
    } else {
        format!("${:.2}", price)
    }
}

/// Formats a rating with one decimal (`4.6`).
pub fn format_rating(rating: f64) -> String {
    format!("{:.1}", rating)
}

/// Stock availability text for the detail screen.
pub fn stock_label(stock: i64) -> String {
    if stock > 0 {
        format!("In stock ({})", stock)
    } else {
        "Out of stock".to_string()
    }
}

/// One-line card summary: `title · $price · ★rating`.
pub fn card_line(product: &Product) -> String {
    format!(
        "{} · {} · ★{}",
        product.title,
        format_price(product.price),
        format_rating(product.rating)
    )
}
