//! Browse page handlers: full-page render model or bare JSON, depending on
//! whether the request is an asynchronous partial-state fetch.

use std::collections::{BTreeMap, BTreeSet};

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::response::{IntoResponse, Response};
use common::browse_query::AppliedFilters;
use common::browse_result::PageModel;
use tracing::info;

use crate::browse::{browse, parse_positive_integer, sanitize};
use crate::error::Result;
use crate::state::AppState;

/// Browse over the whole catalog with no fixed filters.
pub async fn search_page(
    State(state): State<AppState>,
    Path(page_number): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Response> {
    let page_title = match params.get("q").map(|q| q.trim()) {
        Some(q) if !q.is_empty() => format!("Search results for '{}'", q),
        _ => "Browse catalog".to_string(),
    };
    handle_browse(
        state,
        page_number,
        params,
        AppliedFilters::new(),
        page_title,
        "/search/page/",
    )
    .await
}

pub async fn villagers_page(
    State(state): State<AppState>,
    Path(page_number): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Response> {
    handle_browse(
        state,
        page_number,
        params,
        fixed_type("villager"),
        "Villagers".to_string(),
        "/villagers/page/",
    )
    .await
}

pub async fn items_page(
    State(state): State<AppState>,
    Path(page_number): Path<String>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Response> {
    handle_browse(
        state,
        page_number,
        params,
        fixed_type("item"),
        "Items".to_string(),
        "/items/page/",
    )
    .await
}

fn fixed_type(entity_type: &str) -> AppliedFilters {
    let mut fixed = AppliedFilters::new();
    fixed.insert(
        "type".to_string(),
        BTreeSet::from([entity_type.to_string()]),
    );
    fixed
}

/// Shared browse flow: sanitize, merge route-fixed filters, run the engine,
/// then shape the response. `isAjax=true` gets the bare BrowseResult; a
/// full-page request gets the render model with the schema metadata the
/// client needs to mutate filters later.
async fn handle_browse(
    state: AppState,
    page_number: String,
    params: BTreeMap<String, String>,
    fixed: AppliedFilters,
    page_title: String,
    page_url_prefix: &str,
) -> Result<Response> {
    let requested_page = parse_positive_integer(&page_number) as i64;
    let is_ajax = params.get("isAjax").map(String::as_str) == Some("true");

    let mut applied = sanitize(&state.schema, &params)?;
    applied.apply_fixed(&fixed);

    let result = browse(
        &state.schema,
        state.index.as_ref(),
        state.store.as_ref(),
        &applied,
        requested_page,
    )
    .await?;
    info!(
        "browse {}{}: {} of {} results",
        page_url_prefix,
        result.page.current_page,
        result.results.len(),
        result.page.total_count
    );

    if is_ajax {
        return Ok(Json(result).into_response());
    }
    // Handoff point for the template layer; the model carries everything
    // the page render needs.
    let model = PageModel {
        page_title,
        page_url_prefix: page_url_prefix.to_string(),
        all_filters: state.schema.all_filters().clone(),
        result,
    };
    Ok(Json(model).into_response())
}
