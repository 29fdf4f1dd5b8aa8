//! Browse response payloads shared between the engine and its consumers.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::browse_query::AppliedFilters;
use crate::filter_schema::FilterDefinition;


/// Pagination metadata, recomputed per request. Indices are 1-based and
/// inclusive; `end_index` never exceeds `total_count`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageState {
    pub current_page: u64,
    pub total_count: u64,
    pub total_pages: u64,
    pub start_index: u64,
    pub end_index: u64,
}

/// One catalog entity on a result page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySummary {
    pub id: String,
    pub name: String,
    pub url: String,
    pub image_url: String,
}

/// Facet values still selectable under the current filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableFilterValues {
    pub display_name: String,
    /// value id -> display label, restricted to nonempty aggregation buckets.
    pub values: BTreeMap<String, String>,
}

/// The full response of one browse request. This is the sole contract
/// between the engine, the server-side template, and the incremental
/// client-side browser, so it carries everything needed to render filter
/// controls without a separate schema call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrowseResult {
    pub page: PageState,
    pub applied_filters: AppliedFilters,
    pub available_filters: BTreeMap<String, AvailableFilterValues>,
    pub results: Vec<EntitySummary>,
}

/// Server-side render model: the browse result plus the static schema
/// metadata and page chrome the template layer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageModel {
    pub page_title: String,
    pub page_url_prefix: String,
    pub all_filters: BTreeMap<String, FilterDefinition>,
    pub result: BrowseResult,
}
