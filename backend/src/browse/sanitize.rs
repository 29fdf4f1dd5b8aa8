//! Cleaning of untrusted query parameters against the filter schema.

use std::collections::BTreeMap;

use common::browse_query::AppliedFilters;
use common::filter_schema::FilterSchema;

use crate::error::{BrowseError, Result};

/// Converts raw query parameters into schema-constrained applied filters.
///
/// Unknown keys are dropped without error; browsers and bookmarks carry
/// stale query strings and that must not break browsing. Faceted values are
/// split on commas and trimmed; empty parts vanish. An over-long faceted
/// value is a validation failure, an over-long text query is a client error.
pub fn sanitize(
    schema: &FilterSchema,
    raw_params: &BTreeMap<String, String>,
) -> Result<AppliedFilters> {
    let mut applied = AppliedFilters::new();
    for (key, raw_value) in raw_params {
        let Some(definition) = schema.get(key) else {
            continue;
        };
        if definition.is_text_search {
            let cleaned = raw_value.trim();
            if cleaned.is_empty() {
                continue;
            }
            if cleaned.chars().count() > definition.max_value_length {
                return Err(BrowseError::BadRequest(format!(
                    "query for '{}' exceeds {} characters",
                    key, definition.max_value_length
                )));
            }
            applied.insert(key.clone(), [cleaned.to_string()].into_iter().collect());
        } else {
            // Split faceted filters on commas, but never textual queries.
            let mut values = std::collections::BTreeSet::new();
            for part in raw_value.split(',') {
                let cleaned = part.trim();
                if cleaned.is_empty() {
                    continue;
                }
                if cleaned.chars().count() > definition.max_value_length {
                    return Err(BrowseError::Validation(format!(
                        "value for '{}' exceeds {} characters",
                        key, definition.max_value_length
                    )));
                }
                values.insert(cleaned.to_string());
            }
            applied.insert(key.clone(), values);
        }
    }
    Ok(applied)
}

/// Parses a page-number parameter leniently: anything that is not a positive
/// integer becomes page 1.
pub fn parse_positive_integer(raw: &str) -> u64 {
    match raw.trim().parse::<u64>() {
        Ok(value) if value >= 1 => value,
        _ => 1,
    }
}
