//! # catalog-api: REST Client for the Remote Catalog
//!
//! This crate provides:
//! - The [`CatalogApi`] trait controllers depend on
//! - [`HttpCatalogClient`], a reqwest implementation with a uniform timeout
//! - [`CatalogError`], the Server / Network / Request classification
//! - [`CatalogConfig`], loaded from TOML and `CATALOG_*` environment variables
//! - `MockCatalog` for controller tests (feature `mock`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use catalog_api::{CatalogApi, CatalogConfig, HttpCatalogClient};
//!
//! let config = CatalogConfig::load(None)?;
//! let client = HttpCatalogClient::new(&config.api)?;
//!
//! let page = client.list_products(config.browse.page_limit, config.browse.page_skip).await?;
//! println!("{} of {} products", page.products.len(), page.total);
//! ```

pub mod client;
pub mod config;
pub mod error;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{CatalogApi, HttpCatalogClient};
pub use config::{ApiSettings, BrowseSettings, CatalogConfig};
pub use error::{CatalogError, CatalogResult};

#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockCatalog, MockEndpoint};
