//! # Browser Controller
//!
//! Owns the [`BrowseState`] of the product list screen.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Browser Operations                                   │
//! │                                                                         │
//! │  Operation               Catalog calls                  On success      │
//! │  ─────────               ─────────────                  ──────────      │
//! │                                                                         │
//! │  initialize() ─────────► list_products(limit, skip) ┐                   │
//! │                          list_categories()         ─┴► products +       │
//! │                          (concurrent, fail-fast)       categories       │
//! │                                                                         │
//! │  filter_by_category("") ► list_products(limit, skip) ─► products        │
//! │  filter_by_category(l) ─► products_by_category(slug) ─► products        │
//! │                                                                         │
//! │  sort_products(key) ───► (none) ──────────────────────► reorder held    │
//! │                                                                         │
//! │  Any failure: error = message, loading = false, products untouched.    │
//! │  Only the latest request may settle the state.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use catalog_api::{BrowseSettings, CatalogApi};
use catalog_core::state::Generation;
use catalog_core::{BrowseAction, BrowseState, SortKey};
use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{failure_message, InFlight};

/// Drives the product list screen against a [`CatalogApi`].
pub struct BrowserController<C: CatalogApi> {
    client: Arc<C>,
    settings: BrowseSettings,
    state: watch::Sender<BrowseState>,
    session_id: Uuid,
}

impl<C: CatalogApi> BrowserController<C> {
    /// Creates a controller in the idle state, sorted by the configured key.
    pub fn new(client: Arc<C>, settings: BrowseSettings) -> Self {
        let initial = BrowseState {
            sort_by: settings.default_sort,
            ..BrowseState::new()
        };
        let (state, _) = watch::channel(initial);

        BrowserController {
            client,
            settings,
            state,
            session_id: Uuid::new_v4(),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> BrowseState {
        self.state.borrow().clone()
    }

    /// A receiver notified after every applied transition.
    pub fn subscribe(&self) -> watch::Receiver<BrowseState> {
        self.state.subscribe()
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    // =========================================================================
    // Fetching Operations
    // =========================================================================

    /// Loads the first page of products and the category list together.
    ///
    /// Either request failing fails the whole load; neither result is
    /// applied on its own.
    pub async fn initialize(&self) {
        let in_flight = self.start(None);
        let generation = in_flight.generation();
        info!(session = %self.session_id, generation, "initializing product browser");

        let result = tokio::try_join!(
            self.client
                .list_products(self.settings.page_limit, self.settings.page_skip),
            self.client.list_categories(),
        );

        let applied = match result {
            Ok((page, categories)) => {
                debug!(
                    session = %self.session_id,
                    generation,
                    products = page.products.len(),
                    total = page.total,
                    categories = categories.len(),
                    "initial load succeeded"
                );
                in_flight.settle(|state| {
                    state.apply(BrowseAction::FetchSucceeded {
                        generation,
                        products: page.products,
                        categories: Some(categories),
                        at: Utc::now(),
                    })
                })
            }
            Err(err) => {
                error!(session = %self.session_id, generation, error = %err, retryable = err.is_retryable(), "Error initializing product browser");
                let message = failure_message(&err);
                in_flight.settle(|state| {
                    state.apply(BrowseAction::FetchFailed {
                        generation,
                        message,
                        at: Utc::now(),
                    })
                })
            }
        };

        if !applied {
            debug!(session = %self.session_id, generation, "initial load superseded, result dropped");
        } else if self.state.borrow().generation != generation {
            debug!(session = %self.session_id, generation, "initial load superseded, categories kept");
        }
    }

    /// Shows the products of the category with display label `label`.
    ///
    /// An empty label returns to the unfiltered listing.
    pub async fn filter_by_category(&self, label: &str) {
        let slug = self.state.borrow().slug_for(label).to_string();
        let in_flight = self.start(Some(label.to_string()));
        let generation = in_flight.generation();
        info!(session = %self.session_id, generation, category = %label, %slug, "filtering products");

        let result = if label.is_empty() {
            self.client
                .list_products(self.settings.page_limit, self.settings.page_skip)
                .await
        } else {
            self.client.products_by_category(&slug).await
        };

        let applied = match result {
            Ok(page) => in_flight.settle(|state| {
                state.apply(BrowseAction::FetchSucceeded {
                    generation,
                    products: page.products,
                    categories: None,
                    at: Utc::now(),
                })
            }),
            Err(err) => {
                error!(session = %self.session_id, generation, category = %label, error = %err, retryable = err.is_retryable(), "Error filtering products");
                let message = failure_message(&err);
                in_flight.settle(|state| {
                    state.apply(BrowseAction::FetchFailed {
                        generation,
                        message,
                        at: Utc::now(),
                    })
                })
            }
        };

        if !applied {
            debug!(session = %self.session_id, generation, category = %label, "filter superseded, result dropped");
        }
    }

    /// Re-runs the joint initial load.
    pub async fn retry_initialize(&self) {
        self.initialize().await
    }

    /// Re-runs the request for the active category filter.
    pub async fn retry_last_filter(&self) {
        let label = self.state.borrow().active_category.clone();
        self.filter_by_category(&label).await
    }

    /// Same as [`retry_initialize`](Self::retry_initialize).
    pub async fn retry(&self) {
        self.retry_initialize().await
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Reorders the products already held. No request is made.
    pub fn sort_products(&self, key: SortKey) {
        debug!(session = %self.session_id, sort = %key, "sorting products");
        self.state
            .send_modify(|state| {
                state.apply(BrowseAction::Sorted { key });
            });
    }

    /// Sorts by a raw key such as `"price-desc"`.
    ///
    /// Unknown keys leave the state untouched, products included.
    pub fn sort_products_by_raw_key(&self, raw: &str) {
        match raw.parse::<SortKey>() {
            Ok(key) => self.sort_products(key),
            Err(err) => debug!(session = %self.session_id, error = %err, "ignoring sort request"),
        }
    }

    /// Applies `LoadingStarted` and returns the guard for the new generation.
    fn start(&self, category: Option<String>) -> InFlight<'_, BrowseState> {
        let mut generation: Generation = 0;
        self.state.send_modify(|state| {
            state.apply(BrowseAction::LoadingStarted { category });
            generation = state.generation;
        });
        InFlight::new(&self.state, generation)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use catalog_api::{CatalogError, MockCall, MockCatalog, MockEndpoint};
    use catalog_core::{BrowseStatus, CategoryLabel, Product, ProductId, ProductsResponse};

    fn product(id: ProductId, title: &str, price: f64) -> Product {
        Product {
            id,
            title: title.to_string(),
            price,
            thumbnail: format!("https://cdn.example.com/{}.png", id),
            description: String::new(),
            brand: "Brand".to_string(),
            category: "misc".to_string(),
            stock: 10,
            rating: 4.2,
        }
    }

    fn page(products: Vec<Product>) -> ProductsResponse {
        let total = products.len() as u64;
        ProductsResponse { products, total }
    }

    fn category(slug: &str, label: &str) -> CategoryLabel {
        CategoryLabel {
            slug: slug.to_string(),
            label: label.to_string(),
        }
    }

    fn settings() -> BrowseSettings {
        BrowseSettings {
            page_limit: 20,
            page_skip: 0,
            default_sort: SortKey::NameAsc,
        }
    }

    fn controller(mock: &Arc<MockCatalog>) -> BrowserController<MockCatalog> {
        BrowserController::new(Arc::clone(mock), settings())
    }

    fn seeded_mock() -> MockCatalog {
        MockCatalog::new()
            .with_products(Ok(page(vec![
                product(1, "Lamp", 20.0),
                product(2, "Lipstick", 12.99),
            ])))
            .with_categories(Ok(vec![
                category("beauty", "Beauty"),
                category("home-decoration", "Home decoration"),
            ]))
    }

    #[test]
    fn test_new_controller_is_idle_with_configured_sort() {
        let mock = Arc::new(MockCatalog::new());
        let controller = BrowserController::new(
            mock,
            BrowseSettings {
                default_sort: SortKey::RatingDesc,
                ..settings()
            },
        );

        let state = controller.snapshot();
        assert_eq!(state.status(), BrowseStatus::Idle);
        assert!(!state.loading);
        assert_eq!(state.sort_by, SortKey::RatingDesc);
    }

    #[tokio::test]
    async fn test_initialize_loads_products_and_categories() {
        let mock = Arc::new(seeded_mock());
        let controller = controller(&mock);

        controller.initialize().await;

        let state = controller.snapshot();
        assert_eq!(state.products.len(), 2);
        assert_eq!(state.categories, vec!["Beauty", "Home decoration"]);
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.status(), BrowseStatus::Ready);
        assert_eq!(
            mock.calls(),
            vec![MockCall::Products { limit: 20, skip: 0 }, MockCall::Categories]
        );
    }

    #[tokio::test]
    async fn test_initialize_fails_when_categories_fail() {
        let mock = Arc::new(seeded_mock().with_categories(Err(CatalogError::Server {
            status: 500,
            status_text: "Internal Server Error".to_string(),
        })));
        let controller = controller(&mock);

        controller.initialize().await;

        let state = controller.snapshot();
        assert!(state.products.is_empty());
        assert!(state.categories.is_empty());
        assert!(!state.loading);
        assert_eq!(
            state.error.as_deref(),
            Some("API Error: 500 - Internal Server Error")
        );
        assert_eq!(state.status(), BrowseStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_initialize_fails_fast() {
        let mock = Arc::new(
            seeded_mock()
                .with_categories(Err(CatalogError::Network))
                .with_latency(MockEndpoint::Products, Duration::from_secs(30)),
        );
        let controller = controller(&mock);

        let start = tokio::time::Instant::now();
        controller.initialize().await;

        assert!(start.elapsed() < Duration::from_secs(30));
        let state = controller.snapshot();
        assert!(state.products.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("Network error: Unable to connect to the server")
        );
    }

    #[tokio::test]
    async fn test_filter_resolves_label_to_slug() {
        let mock = Arc::new(seeded_mock().with_category(
            "home-decoration",
            Ok(page(vec![product(1, "Lamp", 20.0)])),
        ));
        let controller = controller(&mock);
        controller.initialize().await;

        controller.filter_by_category("Home decoration").await;

        let state = controller.snapshot();
        assert_eq!(state.active_category, "Home decoration");
        assert_eq!(state.products.len(), 1);
        assert_eq!(state.products[0].id, 1);
        // Categories survive a filter
        assert_eq!(state.categories.len(), 2);
        assert_eq!(
            mock.calls().last(),
            Some(&MockCall::Category("home-decoration".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unknown_label_is_sent_verbatim() {
        let mock = Arc::new(MockCatalog::new());
        let controller = controller(&mock);

        controller.filter_by_category("smartphones").await;

        assert_eq!(
            mock.calls(),
            vec![MockCall::Category("smartphones".to_string())]
        );
        assert_eq!(controller.snapshot().status(), BrowseStatus::Ready);
    }

    #[tokio::test]
    async fn test_empty_filter_restores_full_listing() {
        let mock = Arc::new(
            seeded_mock().with_category("beauty", Ok(page(vec![product(2, "Lipstick", 12.99)]))),
        );
        let controller = controller(&mock);
        controller.initialize().await;
        controller.filter_by_category("Beauty").await;
        assert_eq!(controller.snapshot().products.len(), 1);

        controller.filter_by_category("").await;

        let state = controller.snapshot();
        assert_eq!(state.products.len(), 2);
        assert!(state.active_category.is_empty());
        assert_eq!(
            mock.calls().last(),
            Some(&MockCall::Products { limit: 20, skip: 0 })
        );
    }

    #[tokio::test]
    async fn test_filter_failure_keeps_previous_products() {
        let mock = Arc::new(seeded_mock().with_category(
            "beauty",
            Err(CatalogError::Server {
                status: 503,
                status_text: "Service Unavailable".to_string(),
            }),
        ));
        let controller = controller(&mock);
        controller.initialize().await;

        controller.filter_by_category("Beauty").await;

        let state = controller.snapshot();
        assert_eq!(state.products.len(), 2);
        assert_eq!(state.active_category, "Beauty");
        assert_eq!(
            state.error.as_deref(),
            Some("API Error: 503 - Service Unavailable")
        );
        assert!(!state.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_filter_wins_over_slow_initialize() {
        let mock = Arc::new(
            seeded_mock()
                .with_latency(MockEndpoint::Products, Duration::from_millis(500))
                .with_category("beauty", Ok(page(vec![product(2, "Lipstick", 12.99)]))),
        );
        let controller = controller(&mock);

        tokio::join!(controller.initialize(), controller.filter_by_category("beauty"));

        let state = controller.snapshot();
        assert_eq!(state.products.len(), 1);
        assert_eq!(state.products[0].id, 2);
        // Only the superseded products are dropped
        assert_eq!(state.categories, vec!["Beauty", "Home decoration"]);
        assert_eq!(state.active_category, "beauty");
        assert!(!state.loading);
        assert!(state.error.is_none());
        assert_eq!(state.generation, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_categories_survive_filter_during_slow_initialize() {
        let mock = Arc::new(
            seeded_mock()
                .with_latency(MockEndpoint::Categories, Duration::from_millis(500))
                .with_category("beauty", Ok(page(vec![product(2, "Lipstick", 12.99)]))),
        );
        let controller = controller(&mock);

        tokio::join!(controller.initialize(), async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            controller.filter_by_category("beauty").await;
        });
        controller.filter_by_category("").await;

        let state = controller.snapshot();
        assert_eq!(state.categories, vec!["Beauty", "Home decoration"]);
        assert_eq!(state.slug_for("Home decoration"), "home-decoration");
        assert_eq!(state.products.len(), 2);
        assert!(state.error.is_none());
        assert_eq!(state.status(), BrowseStatus::Ready);
        assert_eq!(
            mock.calls()
                .iter()
                .filter(|c| matches!(c, MockCall::Categories))
                .count(),
            1
        );
    }

    #[tokio::test]
    async fn test_sort_reorders_without_fetching() {
        let mock = Arc::new(seeded_mock());
        let controller = controller(&mock);
        controller.initialize().await;
        let calls = mock.calls().len();

        controller.sort_products(SortKey::PriceAsc);
        let ids: Vec<_> = controller.snapshot().products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![2, 1]);

        controller.sort_products_by_raw_key("name-asc");
        let state = controller.snapshot();
        let ids: Vec<_> = state.products.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        assert_eq!(state.sort_by, SortKey::NameAsc);

        assert_eq!(mock.calls().len(), calls);
    }

    #[tokio::test]
    async fn test_unknown_raw_sort_key_is_ignored() {
        let mock = Arc::new(seeded_mock());
        let controller = controller(&mock);
        controller.initialize().await;
        controller.sort_products(SortKey::PriceDesc);
        let before = controller.snapshot();

        controller.sort_products_by_raw_key("popularity");

        assert_eq!(controller.snapshot(), before);
    }

    #[tokio::test]
    async fn test_sort_on_empty_list() {
        let mock = Arc::new(MockCatalog::new());
        let controller = controller(&mock);

        controller.sort_products(SortKey::RatingDesc);

        let state = controller.snapshot();
        assert!(state.products.is_empty());
        assert_eq!(state.sort_by, SortKey::RatingDesc);
    }

    #[tokio::test]
    async fn test_retry_initialize_recovers() {
        let mock = Arc::new(seeded_mock().with_products(Err(CatalogError::Network)));
        let controller = controller(&mock);
        controller.initialize().await;
        assert_eq!(controller.snapshot().status(), BrowseStatus::Failed);

        mock.set_products(Ok(page(vec![product(1, "Lamp", 20.0)])));
        controller.retry().await;

        let state = controller.snapshot();
        assert_eq!(state.status(), BrowseStatus::Ready);
        assert!(state.error.is_none());
        assert_eq!(state.products.len(), 1);
        assert_eq!(state.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_retry_last_filter_replays_category() {
        let mock = Arc::new(seeded_mock().with_category("beauty", Err(CatalogError::Network)));
        let controller = controller(&mock);
        controller.initialize().await;
        controller.filter_by_category("Beauty").await;
        assert!(controller.snapshot().error.is_some());

        mock.set_category("beauty", Ok(page(vec![product(2, "Lipstick", 12.99)])));
        controller.retry_last_filter().await;

        let state = controller.snapshot();
        assert!(state.error.is_none());
        assert_eq!(state.products.len(), 1);
        assert_eq!(
            mock.calls().last(),
            Some(&MockCall::Category("beauty".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_initialize_clears_loading() {
        let mock = Arc::new(seeded_mock().with_latency(MockEndpoint::Categories, Duration::from_secs(5)));
        let controller = controller(&mock);

        let outcome =
            tokio::time::timeout(Duration::from_millis(100), controller.initialize()).await;

        assert!(outcome.is_err());
        let state = controller.snapshot();
        assert!(!state.loading);
        assert!(state.products.is_empty());
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_subscribers_observe_transitions() {
        let mock = Arc::new(seeded_mock());
        let controller = controller(&mock);
        let mut rx = controller.subscribe();
        assert!(!rx.has_changed().unwrap());

        controller.initialize().await;

        assert!(rx.has_changed().unwrap());
        let seen = rx.borrow_and_update().clone();
        assert_eq!(seen.products.len(), 2);
        assert!(!seen.loading);

        // Ignored raw keys do not notify
        controller.sort_products_by_raw_key("bogus");
        assert!(!rx.has_changed().unwrap());
    }
}
