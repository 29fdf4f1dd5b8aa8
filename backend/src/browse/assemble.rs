//! Orchestration of one browse request against the index and entity store.

use std::collections::BTreeMap;

use common::browse_const::{IMAGE_NOT_AVAILABLE, PAGE_SIZE};
use common::browse_query::AppliedFilters;
use common::browse_result::{AvailableFilterValues, BrowseResult, EntitySummary};
use common::filter_schema::FilterSchema;
use tracing::debug;

use crate::browse::pagination::compute_page_state;
use crate::browse::query::{build_aggregations, build_facet_queries, build_root_query, build_text_query};
use crate::entity_store::EntityStore;
use crate::error::Result;
use crate::index_client::{RawFilterAggregation, SearchIndex, SearchRequest};

/// Runs a full browse: count, then (when nonzero) one combined
/// search-plus-aggregations call and one batched entity fetch. At most three
/// outbound calls regardless of page size.
pub async fn browse(
    schema: &FilterSchema,
    index: &dyn SearchIndex,
    store: &dyn EntityStore,
    applied: &AppliedFilters,
    requested_page: i64,
) -> Result<BrowseResult> {
    let text_query = build_text_query(schema, applied);
    let facet_queries = build_facet_queries(schema, applied);
    let root_query = build_root_query(&facet_queries, text_query.as_ref());

    let total_count = index.count(&root_query).await?;
    if total_count == 0 {
        // Nothing to show; skip the search and aggregation round trip.
        return Ok(BrowseResult {
            page: compute_page_state(requested_page, PAGE_SIZE, 0),
            applied_filters: applied.clone(),
            available_filters: BTreeMap::new(),
            results: Vec::new(),
        });
    }

    let page = compute_page_state(requested_page, PAGE_SIZE, total_count);
    let request = SearchRequest {
        from: PAGE_SIZE * (page.current_page - 1),
        size: PAGE_SIZE,
        query: root_query,
        aggregations: build_aggregations(schema, &facet_queries, text_query.as_ref()),
    };
    let response = index.search(&request).await?;

    let available_filters = derive_available_filters(schema, &response.aggregations);

    let ids: Vec<String> = response.hits.into_iter().map(|hit| hit.id).collect();
    let entities = store.get_by_ids(&ids).await?;
    let mut results = Vec::with_capacity(ids.len());
    for (id, entity) in ids.iter().zip(entities) {
        match entity {
            Some(entity) => results.push(EntitySummary {
                url: format!("/{}/{}", entity.entity_type, entity.id),
                image_url: entity
                    .image_url
                    .unwrap_or_else(|| IMAGE_NOT_AVAILABLE.to_string()),
                id: entity.id,
                name: entity.name,
            }),
            None => {
                // The index can briefly outlive a deleted entity; drop the
                // hit rather than fail the page.
                debug!("dropping stale hit with no entity record: {}", id);
            }
        }
    }

    Ok(BrowseResult {
        page,
        applied_filters: applied.clone(),
        available_filters,
        results,
    })
}

/// Keeps only facet values whose bucket is nonempty and that the schema
/// actually declares; an index bucket unknown to the schema is ignored.
fn derive_available_filters(
    schema: &FilterSchema,
    aggregations: &BTreeMap<String, RawFilterAggregation>,
) -> BTreeMap<String, AvailableFilterValues> {
    let mut available = BTreeMap::new();
    for definition in schema.aggregatable_definitions() {
        let Some(allowed_values) = &definition.allowed_values else {
            continue;
        };
        let Some(filter_aggregation) = aggregations.get(&format!("{}_filter", definition.key))
        else {
            continue;
        };
        let Some(terms) = filter_aggregation.facets.get(&definition.key) else {
            continue;
        };
        let mut values = BTreeMap::new();
        for bucket in &terms.buckets {
            if bucket.doc_count == 0 {
                continue;
            }
            if let Some(label) = allowed_values.get(&bucket.key) {
                values.insert(bucket.key.clone(), label.clone());
            }
        }
        if !values.is_empty() {
            available.insert(
                definition.key.clone(),
                AvailableFilterValues {
                    display_name: definition.display_name.clone(),
                    values,
                },
            );
        }
    }
    available
}
