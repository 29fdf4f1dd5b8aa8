//! Shared application state.

use std::sync::Arc;

use common::filter_schema::FilterSchema;

use crate::entity_store::EntityStore;
use crate::index_client::SearchIndex;

/// Read-only state shared across concurrent requests. Nothing here is
/// mutated after startup, so no locks are needed.
#[derive(Clone)]
pub struct AppState {
    pub schema: Arc<FilterSchema>,
    pub index: Arc<dyn SearchIndex>,
    pub store: Arc<dyn EntityStore>,
}
