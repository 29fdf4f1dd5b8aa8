//! Search-box suggestion endpoint.

use std::collections::{BTreeMap, HashSet};

use axum::Json;
use axum::extract::{Query, State};
use common::browse_const::MAX_QUERY_LENGTH;

use crate::error::{BrowseError, Result};
use crate::state::AppState;

const SUGGESTION_LIMIT: u64 = 10;

/// Returns a flat, de-duplicated list of suggestions for a prefix. Shares
/// the length policy of the main text query.
pub async fn autocomplete(
    State(state): State<AppState>,
    Query(params): Query<BTreeMap<String, String>>,
) -> Result<Json<Vec<String>>> {
    let prefix = params.get("q").map(|q| q.trim()).unwrap_or("");
    if prefix.is_empty() {
        return Ok(Json(Vec::new()));
    }
    if prefix.chars().count() > MAX_QUERY_LENGTH {
        return Err(BrowseError::BadRequest(format!(
            "query exceeds {} characters",
            MAX_QUERY_LENGTH
        )));
    }

    let raw_suggestions = state.index.suggest(prefix, SUGGESTION_LIMIT).await?;
    let mut seen = HashSet::new();
    let suggestions = raw_suggestions
        .into_iter()
        .filter(|suggestion| seen.insert(suggestion.clone()))
        .collect();
    Ok(Json(suggestions))
}
