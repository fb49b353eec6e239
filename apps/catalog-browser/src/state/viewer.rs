//! # Viewer Controller
//!
//! Owns the [`ViewerState`] of the product detail screen. The state is
//! scoped to one product id; switching ids discards everything held for
//! the old one.

use std::sync::Arc;

use catalog_api::CatalogApi;
use catalog_core::state::Generation;
use catalog_core::{ProductId, ViewAction, ViewerState};
use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, error, info};
use uuid::Uuid;

use super::{failure_message, InFlight};

/// Drives the product detail screen against a [`CatalogApi`].
pub struct ViewerController<C: CatalogApi> {
    client: Arc<C>,
    state: watch::Sender<ViewerState>,
    session_id: Uuid,
}

impl<C: CatalogApi> ViewerController<C> {
    /// Creates an idle controller for `product_id`. Nothing is fetched
    /// until [`activate`](Self::activate).
    pub fn new(client: Arc<C>, product_id: ProductId) -> Self {
        let (state, _) = watch::channel(ViewerState::new(product_id));
        ViewerController {
            client,
            state,
            session_id: Uuid::new_v4(),
        }
    }

    pub fn snapshot(&self) -> ViewerState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ViewerState> {
        self.state.subscribe()
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Loads the product this controller is scoped to.
    pub async fn activate(&self) {
        self.load().await
    }

    /// Rescopes the controller to another product and loads it.
    ///
    /// The same id is a no-op. A response still in flight for the previous
    /// id is dropped when it arrives.
    pub async fn change_id(&self, product_id: ProductId) {
        let changed = self.state.send_if_modified(|state| {
            if state.product_id == product_id {
                return false;
            }
            state.apply(ViewAction::Reset { product_id })
        });
        if !changed {
            debug!(session = %self.session_id, product_id, "product id unchanged");
            return;
        }
        self.load().await
    }

    /// Fetches the current product again.
    pub async fn retry(&self) {
        self.load().await
    }

    async fn load(&self) {
        let in_flight = self.start();
        let generation = in_flight.generation();
        let product_id = self.state.borrow().product_id;
        info!(session = %self.session_id, generation, product_id, "loading product");

        let applied = match self.client.get_product(product_id).await {
            Ok(product) => in_flight.settle(|state| {
                state.apply(ViewAction::FetchSucceeded {
                    generation,
                    product,
                    at: Utc::now(),
                })
            }),
            Err(err) => {
                error!(session = %self.session_id, generation, product_id, error = %err, retryable = err.is_retryable(), "Error loading product");
                let message = failure_message(&err);
                in_flight.settle(|state| {
                    state.apply(ViewAction::FetchFailed {
                        generation,
                        message,
                        at: Utc::now(),
                    })
                })
            }
        };

        if !applied {
            debug!(session = %self.session_id, generation, product_id, "product response superseded, dropped");
        }
    }

    fn start(&self) -> InFlight<'_, ViewerState> {
        let mut generation: Generation = 0;
        self.state.send_modify(|state| {
            state.apply(ViewAction::LoadingStarted);
            generation = state.generation;
        });
        InFlight::new(&self.state, generation)
    }
}
