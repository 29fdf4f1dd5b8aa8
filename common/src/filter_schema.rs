//! Declarative schema for every filterable catalog attribute.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};


/// One filterable/aggregatable attribute of catalog entities.
///
/// Loaded once at process start and never mutated afterwards; the whole
/// schema is safe to share across concurrent requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterDefinition {
    pub key: String,
    pub display_name: String,
    /// Known value ids mapped to their display labels. `None` for the
    /// free-text search definition, which accepts arbitrary strings.
    pub allowed_values: Option<BTreeMap<String, String>>,
    pub is_text_search: bool,
    pub is_aggregatable: bool,
    /// Display ordering among filters; lower sorts first.
    pub sort_order: i32,
    pub max_value_length: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterSchema {
    filters: BTreeMap<String, FilterDefinition>,
    text_search_key: String,
}

/// Returned when a schema fails its construction invariants.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError(pub String);

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid filter schema: {}", self.0)
    }
}

impl std::error::Error for SchemaError {}

impl FilterSchema {
    /// Builds a schema from its definitions. Exactly one definition must be
    /// flagged as text search; duplicate keys are rejected.
    pub fn new(definitions: Vec<FilterDefinition>) -> Result<Self, SchemaError> {
        let mut filters = BTreeMap::new();
        let mut text_search_key = None;
        for definition in definitions {
            if definition.is_text_search {
                if text_search_key.is_some() {
                    return Err(SchemaError(
                        "more than one text-search filter defined".to_string(),
                    ));
                }
                text_search_key = Some(definition.key.clone());
            }
            let key = definition.key.clone();
            if filters.insert(key.clone(), definition).is_some() {
                return Err(SchemaError(format!("duplicate filter key: {}", key)));
            }
        }
        let Some(text_search_key) = text_search_key else {
            return Err(SchemaError("no text-search filter defined".to_string()));
        };
        Ok(FilterSchema {
            filters,
            text_search_key,
        })
    }

    pub fn get(&self, key: &str) -> Option<&FilterDefinition> {
        self.filters.get(key)
    }

    pub fn text_search_key(&self) -> &str {
        &self.text_search_key
    }

    /// All definitions in display `sort_order`.
    pub fn definitions(&self) -> Vec<&FilterDefinition> {
        let mut definitions: Vec<&FilterDefinition> = self.filters.values().collect();
        definitions.sort_by_key(|definition| (definition.sort_order, definition.key.as_str()));
        definitions
    }

    /// Definitions that participate in facet aggregation, in display order.
    pub fn aggregatable_definitions(&self) -> Vec<&FilterDefinition> {
        self.definitions()
            .into_iter()
            .filter(|definition| definition.is_aggregatable)
            .collect()
    }

    /// Schema metadata handed to the page-render model so the client can
    /// build filter controls without a separate schema call.
    pub fn all_filters(&self) -> &BTreeMap<String, FilterDefinition> {
        &self.filters
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn text_definition(key: &str) -> FilterDefinition {
        FilterDefinition {
            key: key.to_string(),
            display_name: "Search".to_string(),
            allowed_values: None,
            is_text_search: true,
            is_aggregatable: false,
            sort_order: 0,
            max_value_length: 64,
        }
    }

    fn facet_definition(key: &str, sort_order: i32) -> FilterDefinition {
        FilterDefinition {
            key: key.to_string(),
            display_name: key.to_string(),
            allowed_values: Some(BTreeMap::new()),
            is_text_search: false,
            is_aggregatable: true,
            sort_order,
            max_value_length: 32,
        }
    }

    #[test]
    fn exactly_one_text_search_definition_is_required() {
        assert!(FilterSchema::new(vec![facet_definition("gender", 1)]).is_err());
        assert!(
            FilterSchema::new(vec![text_definition("q"), text_definition("q2")]).is_err()
        );
        let schema =
            FilterSchema::new(vec![text_definition("q"), facet_definition("gender", 1)])
                .unwrap();
        assert_eq!(schema.text_search_key(), "q");
    }

    #[test]
    fn duplicate_keys_are_rejected() {
        let result = FilterSchema::new(vec![
            text_definition("q"),
            facet_definition("gender", 1),
            facet_definition("gender", 2),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn definitions_are_ordered_by_sort_order() {
        let schema = FilterSchema::new(vec![
            text_definition("q"),
            facet_definition("species", 3),
            facet_definition("gender", 1),
        ])
        .unwrap();
        let keys: Vec<&str> = schema
            .aggregatable_definitions()
            .into_iter()
            .map(|definition| definition.key.as_str())
            .collect();
        assert_eq!(keys, vec!["gender", "species"]);
    }
}
