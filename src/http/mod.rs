//! HTTP surface: router, handlers and response encoding.

mod error;
mod handlers;
mod json;
mod router;
mod server;

pub use error::ApiError;
pub use json::{HtmlSafeFormatter, respond_json, to_json_vec};
pub use router::{COLLECTION_PATH, parse_id, router};
pub use server::serve;

use crate::storage::SuggestionStore;
use std::sync::Arc;

/// Shared state handed to every handler. Handlers reach the store only
/// through here.
#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn SuggestionStore>,
}

impl AppState {
    /// Creates handler state around a store.
    #[must_use]
    pub fn new(store: Arc<dyn SuggestionStore>) -> Self {
        Self { store }
    }

    /// Returns the store.
    #[must_use]
    pub const fn store(&self) -> &Arc<dyn SuggestionStore> {
        &self.store
    }
}
