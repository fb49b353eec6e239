//! # State Module
//!
//! The two view controllers of the catalog browser.
//!
//! ## Why Two Controllers?
//! Instead of one store holding every screen, each screen owns a controller
//! scoped to its lifetime:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Controller Architecture                              │
//! │                                                                         │
//! │  ┌──────────────────────────────┐   ┌──────────────────────────────┐   │
//! │  │     BrowserController        │   │     ViewerController         │   │
//! │  │                              │   │                              │   │
//! │  │  initialize()  (joint load)  │   │  activate()                  │   │
//! │  │  filter_by_category(label)   │   │  change_id(id)               │   │
//! │  │  sort_products(key)          │   │  retry()                     │   │
//! │  │  retry_initialize()          │   │                              │   │
//! │  │  retry_last_filter()         │   │                              │   │
//! │  │                              │   │                              │   │
//! │  │  watch::Sender<BrowseState>  │   │  watch::Sender<ViewerState>  │   │
//! │  └──────────────┬───────────────┘   └──────────────┬───────────────┘   │
//! │                 │     snapshot() / subscribe()      │                   │
//! │                 └──────────────┬────────────────────┘                   │
//! │                                ▼                                        │
//! │                       Presentation layer                               │
//! │                                                                         │
//! │  MUTATION: only through catalog-core reducers (`apply`), never by hand │
//! │  STALENESS: every settle carries its request generation                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod browser;
mod viewer;

pub use browser::BrowserController;
pub use viewer::ViewerController;

use std::fmt::Display;

use catalog_core::state::Generation;
use catalog_core::{BrowseAction, BrowseState, ViewAction, ViewerState, UNKNOWN_ERROR_MESSAGE};
use tokio::sync::watch;

/// Text stored in `error` for a failed request.
pub(crate) fn failure_message(err: &impl Display) -> String {
    let message = err.to_string();
    if message.trim().is_empty() {
        UNKNOWN_ERROR_MESSAGE.to_string()
    } else {
        message
    }
}

/// State types that can drop the `loading` flag of an abandoned request.
pub(crate) trait Abandon {
    fn abandon(&mut self, generation: Generation) -> bool;
}

impl Abandon for BrowseState {
    fn abandon(&mut self, generation: Generation) -> bool {
        self.apply(BrowseAction::Abandoned { generation })
    }
}

impl Abandon for ViewerState {
    fn abandon(&mut self, generation: Generation) -> bool {
        self.apply(ViewAction::Abandoned { generation })
    }
}

/// Marks one request generation as in flight.
///
/// Call [`InFlight::settle`] with the outcome. If the guard is dropped
/// unsettled, because the awaiting future was cancelled, `loading` is
/// cleared for that generation so the screen never spins forever.
pub(crate) struct InFlight<'a, S: Abandon> {
    state: &'a watch::Sender<S>,
    generation: Generation,
    settled: bool,
}

impl<'a, S: Abandon> InFlight<'a, S> {
    pub(crate) fn new(state: &'a watch::Sender<S>, generation: Generation) -> Self {
        InFlight {
            state,
            generation,
            settled: false,
        }
    }

    pub(crate) fn generation(&self) -> Generation {
        self.generation
    }

    /// Applies the settle transition; `false` means it was stale.
    pub(crate) fn settle(mut self, apply: impl FnOnce(&mut S) -> bool) -> bool {
        self.settled = true;
        self.state.send_if_modified(apply)
    }
}

impl<S: Abandon> Drop for InFlight<'_, S> {
    fn drop(&mut self) {
        if !self.settled {
            let generation = self.generation;
            self.state.send_if_modified(|state| state.abandon(generation));
        }
    }
}
