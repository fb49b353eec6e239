//! # View State
//!
//! Browse and Viewer state plus the pure reducers that move them between
//! states. Controllers in the app crate own one state object each and feed
//! it actions; nothing else mutates it.
//!
//! ## Transitions
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Fetch State Machine                                │
//! │                                                                         │
//! │          LoadingStarted            FetchSucceeded                       │
//! │   Idle ─────────────────► Loading ─────────────────► Ready              │
//! │                            │   ▲                       │                │
//! │              FetchFailed   │   │   LoadingStarted      │                │
//! │                            ▼   │   (filter, retry)     │                │
//! │                           Failed ◄─────────────────────┘                │
//! │                                                                         │
//! │  LoadingStarted  : generation += 1, loading = true, error = None       │
//! │  FetchSucceeded  : data replaced, loading = false                      │
//! │  FetchFailed     : error = message, loading = false, data untouched    │
//! │                                                                         │
//! │  Settle actions carry the generation they were issued under. One that  │
//! │  does not match the current generation is stale and is dropped, so an  │
//! │  older in-flight response can never overwrite a newer request.         │
//! │  Categories are tracked separately: a superseded joint load still     │
//! │  fills the filter bar unless a newer joint load has started.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::sort::{sort_products, SortKey};
use crate::types::{CategoryLabel, Product, ProductId};

/// Request generation counter. Zero means nothing was ever requested.
pub type Generation = u64;

// =============================================================================
// Browse State
// =============================================================================

/// Derived phase of a [`BrowseState`] or [`ViewerState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BrowseStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// Phase of a [`ViewerState`]; same shape as [`BrowseStatus`].
pub type ViewStatus = BrowseStatus;

/// State behind the product list screen.
///
/// ## Invariants
/// - `loading` is false once the latest request settles
/// - `error` is cleared whenever a new request starts
/// - `categories` and `category_index` are in API order and have equal length
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BrowseState {
    pub products: Vec<Product>,

    /// Display labels for the filter bar.
    pub categories: Vec<String>,

    /// Slug for each entry of `categories`.
    pub category_index: Vec<CategoryLabel>,

    pub loading: bool,

    pub error: Option<String>,

    /// Label of the active filter, empty for "all".
    pub active_category: String,

    pub sort_by: SortKey,

    #[ts(type = "number")]
    pub generation: Generation,

    /// Generation of the latest load that also fetches categories.
    #[ts(type = "number")]
    pub categories_generation: Generation,

    /// When the latest request settled.
    #[ts(as = "Option<String>")]
    pub settled_at: Option<DateTime<Utc>>,
}

/// Everything that can happen to a [`BrowseState`].
#[derive(Debug, Clone, PartialEq)]
pub enum BrowseAction {
    /// A fetch is starting. `category` is set for a filter request and
    /// becomes the active category; initialisation passes `None`.
    LoadingStarted { category: Option<String> },

    /// A fetch settled successfully. `categories` is only present for the
    /// initial (joint) load.
    FetchSucceeded {
        generation: Generation,
        products: Vec<Product>,
        categories: Option<Vec<CategoryLabel>>,
        at: DateTime<Utc>,
    },

    /// A fetch settled with an error message.
    FetchFailed {
        generation: Generation,
        message: String,
        at: DateTime<Utc>,
    },

    /// The request was dropped before it settled (its future was
    /// cancelled). Clears `loading` if it was the latest request.
    Abandoned { generation: Generation },

    /// Reorder the products already held. Never fetches.
    Sorted { key: SortKey },
}

impl BrowseState {
    /// Creates an idle state with no products.
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one action in place.
    ///
    /// Returns `false` when the action was stale and nothing changed, which
    /// lets callers skip notifying observers.
    ///
    /// Filters never fetch categories, so a superseded joint load still
    /// delivers its categories. Only a newer joint load makes them stale.
    pub fn apply(&mut self, action: BrowseAction) -> bool {
        match action {
            BrowseAction::LoadingStarted { category } => {
                self.generation += 1;
                self.loading = true;
                self.error = None;
                match category {
                    Some(category) => self.active_category = category,
                    None => self.categories_generation = self.generation,
                }
                true
            }
            BrowseAction::FetchSucceeded {
                generation,
                products,
                categories,
                at,
            } => {
                let mut changed = false;
                if let Some(categories) = categories {
                    if generation == self.categories_generation {
                        self.categories = categories.iter().map(|c| c.label.clone()).collect();
                        self.category_index = categories;
                        changed = true;
                    }
                }
                if generation != self.generation {
                    return changed;
                }
                self.products = products;
                self.error = None;
                self.loading = false;
                self.settled_at = Some(at);
                true
            }
            BrowseAction::FetchFailed {
                generation,
                message,
                at,
            } => {
                if generation != self.generation {
                    return false;
                }
                self.error = Some(message);
                self.loading = false;
                self.settled_at = Some(at);
                true
            }
            BrowseAction::Abandoned { generation } => {
                if generation != self.generation || !self.loading {
                    return false;
                }
                self.loading = false;
                true
            }
            BrowseAction::Sorted { key } => {
                self.sort_by = key;
                self.products = sort_products(&self.products, key);
                true
            }
        }
    }

    /// Derived phase for the presentation layer.
    pub fn status(&self) -> BrowseStatus {
        derive_status(self.loading, self.error.is_some(), self.generation)
    }

    /// Resolves a display label to the slug the catalog expects.
    ///
    /// First match in API order wins. Unknown labels pass through verbatim.
    pub fn slug_for<'a>(&'a self, label: &'a str) -> &'a str {
        self.category_index
            .iter()
            .find(|c| c.label == label)
            .map(|c| c.slug.as_str())
            .unwrap_or(label)
    }
}

/// Pure reducer: returns the state after `action`, leaving `state` as is.
pub fn reduce_browse(state: &BrowseState, action: BrowseAction) -> BrowseState {
    let mut next = state.clone();
    next.apply(action);
    next
}

// =============================================================================
// Viewer State
// =============================================================================

/// State behind the product detail screen, scoped to one product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ViewerState {
    #[ts(type = "number")]
    pub product_id: ProductId,

    pub product: Option<Product>,

    pub loading: bool,

    pub error: Option<String>,

    #[ts(type = "number")]
    pub generation: Generation,

    #[ts(as = "Option<String>")]
    pub settled_at: Option<DateTime<Utc>>,
}

/// Everything that can happen to a [`ViewerState`].
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    /// Discard everything and scope the state to another product id.
    /// The generation keeps counting so in-flight responses for the old id
    /// are recognised as stale.
    Reset { product_id: ProductId },

    LoadingStarted,

    FetchSucceeded {
        generation: Generation,
        product: Product,
        at: DateTime<Utc>,
    },

    FetchFailed {
        generation: Generation,
        message: String,
        at: DateTime<Utc>,
    },

    Abandoned { generation: Generation },
}

impl ViewerState {
    /// Creates an idle state for `product_id`.
    pub fn new(product_id: ProductId) -> Self {
        ViewerState {
            product_id,
            product: None,
            loading: false,
            error: None,
            generation: 0,
            settled_at: None,
        }
    }

    /// Applies one action in place; `false` means a stale action was dropped.
    pub fn apply(&mut self, action: ViewAction) -> bool {
        match action {
            ViewAction::Reset { product_id } => {
                let generation = self.generation;
                *self = ViewerState::new(product_id);
                self.generation = generation;
                true
            }
            ViewAction::LoadingStarted => {
                self.generation += 1;
                self.loading = true;
                self.error = None;
                true
            }
            ViewAction::FetchSucceeded {
                generation,
                product,
                at,
            } => {
                if generation != self.generation {
                    return false;
                }
                self.product = Some(product);
                self.loading = false;
                self.settled_at = Some(at);
                true
            }
            ViewAction::FetchFailed {
                generation,
                message,
                at,
            } => {
                if generation != self.generation {
                    return false;
                }
                self.error = Some(message);
                self.loading = false;
                self.settled_at = Some(at);
                true
            }
            ViewAction::Abandoned { generation } => {
                if generation != self.generation || !self.loading {
                    return false;
                }
                self.loading = false;
                true
            }
        }
    }

    /// Derived phase for the presentation layer.
    pub fn status(&self) -> ViewStatus {
        derive_status(self.loading, self.error.is_some(), self.generation)
    }
}

/// Pure reducer: returns the state after `action`, leaving `state` as is.
pub fn reduce_viewer(state: &ViewerState, action: ViewAction) -> ViewerState {
    let mut next = state.clone();
    next.apply(action);
    next
}

fn derive_status(loading: bool, failed: bool, generation: Generation) -> BrowseStatus {
    if loading {
        BrowseStatus::Loading
    } else if failed {
        BrowseStatus::Failed
    } else if generation == 0 {
        BrowseStatus::Idle
    } else {
        BrowseStatus::Ready
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
