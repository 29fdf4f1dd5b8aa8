//! The concrete catalog filter schema.

use std::collections::BTreeMap;

use common::browse_const::MAX_QUERY_LENGTH;
use common::filter_schema::{FilterDefinition, FilterSchema, SchemaError};

const MAX_FACET_VALUE_LENGTH: usize = 32;

fn labels(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(id, label)| (id.to_string(), label.to_string()))
        .collect()
}

fn facet(key: &str, display_name: &str, sort_order: i32, values: &[(&str, &str)]) -> FilterDefinition {
    FilterDefinition {
        key: key.to_string(),
        display_name: display_name.to_string(),
        allowed_values: Some(labels(values)),
        is_text_search: false,
        is_aggregatable: true,
        sort_order,
        max_value_length: MAX_FACET_VALUE_LENGTH,
    }
}

/// Builds the static schema shared by every request. The `type` filter is
/// route-fixed and kept out of facet aggregation; `q` is the single
/// text-search definition.
pub fn default_catalog_schema() -> Result<FilterSchema, SchemaError> {
    let mut type_filter = facet(
        "type",
        "Type",
        1,
        &[("villager", "Villager"), ("item", "Item")],
    );
    type_filter.is_aggregatable = false;

    FilterSchema::new(vec![
        FilterDefinition {
            key: "q".to_string(),
            display_name: "Search".to_string(),
            allowed_values: None,
            is_text_search: true,
            is_aggregatable: false,
            sort_order: 0,
            max_value_length: MAX_QUERY_LENGTH,
        },
        type_filter,
        facet("gender", "Gender", 2, &[("male", "Male"), ("female", "Female")]),
        facet(
            "species",
            "Species",
            3,
            &[
                ("bear", "Bear"),
                ("bird", "Bird"),
                ("cat", "Cat"),
                ("deer", "Deer"),
                ("dog", "Dog"),
                ("duck", "Duck"),
                ("frog", "Frog"),
                ("mouse", "Mouse"),
                ("rabbit", "Rabbit"),
                ("squirrel", "Squirrel"),
                ("wolf", "Wolf"),
            ],
        ),
        facet(
            "personality",
            "Personality",
            4,
            &[
                ("cranky", "Cranky"),
                ("jock", "Jock"),
                ("lazy", "Lazy"),
                ("normal", "Normal"),
                ("peppy", "Peppy"),
                ("smug", "Smug"),
                ("snooty", "Snooty"),
                ("sisterly", "Sisterly"),
            ],
        ),
        facet(
            "game",
            "Game",
            5,
            &[
                ("classic", "Classic"),
                ("deluxe", "Deluxe"),
                ("frontier", "Frontier"),
                ("horizons", "Horizons"),
            ],
        ),
    ])
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_schema_is_valid() {
        let schema = default_catalog_schema().unwrap();
        assert_eq!(schema.text_search_key(), "q");
        // `type` is route-fixed, so it must not show up as a facet.
        let aggregatable: Vec<&str> = schema
            .aggregatable_definitions()
            .into_iter()
            .map(|definition| definition.key.as_str())
            .collect();
        assert_eq!(aggregatable, vec!["gender", "species", "personality", "game"]);
    }
}
