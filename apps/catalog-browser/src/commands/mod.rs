//! # CLI Commands
//!
//! Each subcommand drives one controller to a settled state and renders
//! the snapshot.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs       ◄─── You are here (shared output options)
//! ├── products.rs  ◄─── browse, categories (BrowserController)
//! └── product.rs   ◄─── show (ViewerController)
//! ```
//!
//! Rendering functions take `impl Write` so tests can capture output in a
//! `Vec<u8>`.

pub mod product;
pub mod products;

use std::io::Write;

use serde::Serialize;

use crate::error::AppResult;

/// How a settled snapshot is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// The raw state snapshot as pretty JSON.
    Json,
}

/// Writes `value` as pretty JSON followed by a newline.
pub(crate) fn write_json<T: Serialize>(out: &mut impl Write, value: &T) -> AppResult<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
    writeln!(out, "{}", json)?;
    Ok(())
}
