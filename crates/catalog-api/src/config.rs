//! # Catalog Configuration
//!
//! Configuration for the catalog client and the default browse request.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     CATALOG_BASE_URL=https://dummyjson.com                             │
//! │     CATALOG_TIMEOUT_SECS=10                                            │
//! │     CATALOG_PAGE_LIMIT=20   CATALOG_PAGE_SKIP=0                        │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, otherwise                                         │
//! │     ~/.config/catalog-browser/catalog.toml (Linux)                     │
//! │     ~/Library/Application Support/dev.catalog.catalog-browser/...      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "https://dummyjson.com"
//! timeout_secs = 10
//!
//! [browse]
//! page_limit = 20
//! page_skip = 0
//! default_sort = "name-asc"
//! ```

use std::path::PathBuf;

use catalog_core::{SortKey, DEFAULT_PAGE_LIMIT, DEFAULT_PAGE_SKIP};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::{CatalogError, CatalogResult};

// =============================================================================
// API Settings
// =============================================================================

/// Where the catalog lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Connect and whole-request timeout (seconds), applied to every request.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Optional User-Agent header.
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_base_url() -> String {
    "https://dummyjson.com".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            user_agent: None,
        }
    }
}

// =============================================================================
// Browse Settings
// =============================================================================

/// Parameters of the unfiltered listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseSettings {
    #[serde(default = "default_page_limit")]
    pub page_limit: u32,

    #[serde(default = "default_page_skip")]
    pub page_skip: u32,

    /// Sort key shown as selected before the user picks one.
    #[serde(default)]
    pub default_sort: SortKey,
}

fn default_page_limit() -> u32 {
    DEFAULT_PAGE_LIMIT
}

fn default_page_skip() -> u32 {
    DEFAULT_PAGE_SKIP
}

impl Default for BrowseSettings {
    fn default() -> Self {
        BrowseSettings {
            page_limit: default_page_limit(),
            page_skip: default_page_skip(),
            default_sort: SortKey::default(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

/// Complete catalog configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub browse: BrowseSettings,
}

impl CatalogConfig {
    /// Resolves the catalog settings and validates the result.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (catalog.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> CatalogResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading catalog config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Rejects settings no request could succeed with.
    pub fn validate(&self) -> CatalogResult<()> {
        let url = &self.api.base_url;
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(CatalogError::Config(format!(
                "base_url must start with http:// or https://, got: {}",
                url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(CatalogError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        if self.browse.page_limit == 0 {
            return Err(CatalogError::Config(
                "page_limit must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    /// Applies `CATALOG_*` overrides read through `lookup`.
    ///
    /// Unparseable numbers are ignored with a warning.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("CATALOG_BASE_URL") {
            debug!(url = %url, "Overriding base URL from environment");
            self.api.base_url = url;
        }

        if let Some(raw) = lookup("CATALOG_TIMEOUT_SECS") {
            match raw.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %raw, "Ignoring invalid CATALOG_TIMEOUT_SECS"),
            }
        }

        if let Some(raw) = lookup("CATALOG_PAGE_LIMIT") {
            match raw.parse::<u32>() {
                Ok(limit) => self.browse.page_limit = limit,
                Err(_) => warn!(value = %raw, "Ignoring invalid CATALOG_PAGE_LIMIT"),
            }
        }

        if let Some(raw) = lookup("CATALOG_PAGE_SKIP") {
            match raw.parse::<u32>() {
                Ok(skip) => self.browse.page_skip = skip,
                Err(_) => warn!(value = %raw, "Ignoring invalid CATALOG_PAGE_SKIP"),
            }
        }
    }

    /// `catalog.toml` in the platform config directory.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("dev", "catalog", "catalog-browser")
            .map(|dirs| dirs.config_dir().join("catalog.toml"))
    }
}
