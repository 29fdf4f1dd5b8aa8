//! Query construction for the external search index.
//!
//! Queries are built as tagged [`Clause`] values instead of ad hoc nested
//! maps, so match-all degeneration and aggregation self-exclusion are
//! enforced by construction rather than by convention.

use std::collections::BTreeMap;

use common::browse_const::MAX_FACET_BUCKETS;
use common::browse_query::AppliedFilters;
use common::filter_schema::FilterSchema;
use serde_json::{Map, Value, json};

/// One boolean query node in the index's JSON query language.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause {
    MatchAll,
    /// Exact match on a faceted field.
    Term { field: String, value: String },
    /// Full-text match with optional automatic fuzziness.
    Match {
        field: String,
        query: String,
        fuzzy: bool,
    },
    /// Phrase match, for quote-style queries.
    MatchPhrase { field: String, query: String },
    /// Disjunction: at least one sub-clause must match.
    Should(Vec<Clause>),
    /// Conjunction: every sub-clause must match.
    Must(Vec<Clause>),
}

impl Clause {
    pub fn is_match_all(&self) -> bool {
        matches!(self, Clause::MatchAll)
    }

    pub fn to_json(&self) -> Value {
        match self {
            Clause::MatchAll => json!({"match_all": {}}),
            Clause::Term { field, value } => {
                let mut fields = Map::new();
                fields.insert(field.clone(), json!({"value": value}));
                json!({"term": fields})
            }
            Clause::Match {
                field,
                query,
                fuzzy,
            } => {
                let mut body = Map::new();
                body.insert("query".to_string(), json!(query));
                if *fuzzy {
                    body.insert("fuzziness".to_string(), json!("AUTO"));
                }
                let mut fields = Map::new();
                fields.insert(field.clone(), Value::Object(body));
                json!({"match": fields})
            }
            Clause::MatchPhrase { field, query } => {
                let mut fields = Map::new();
                fields.insert(field.clone(), json!({"query": query}));
                json!({"match_phrase": fields})
            }
            Clause::Should(clauses) => {
                let clauses: Vec<Value> = clauses.iter().map(Clause::to_json).collect();
                json!({"bool": {"should": clauses}})
            }
            Clause::Must(clauses) => {
                let clauses: Vec<Value> = clauses.iter().map(Clause::to_json).collect();
                json!({"bool": {"must": clauses}})
            }
        }
    }
}

/// Builds the clause for a single filter value. A text search matches either
/// the entity name or an in-universe phrase, so the two are OR'd; any other
/// key is an exact match on its own field.
pub fn build_value_query(schema: &FilterSchema, key: &str, value: &str) -> Clause {
    if key == schema.text_search_key() {
        Clause::Should(vec![
            Clause::Match {
                field: "name".to_string(),
                query: value.to_string(),
                fuzzy: true,
            },
            Clause::MatchPhrase {
                field: "phrase".to_string(),
                query: value.to_string(),
            },
        ])
    } else {
        Clause::Term {
            field: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// One OR-group per faceted filter key: a value list of "male,female" must
/// match either. The text-search key is handled separately and never appears
/// here.
pub fn build_facet_queries(
    schema: &FilterSchema,
    applied: &AppliedFilters,
) -> BTreeMap<String, Clause> {
    let mut facet_queries = BTreeMap::new();
    for (key, values) in applied.iter() {
        if key == schema.text_search_key() {
            continue;
        }
        let clauses: Vec<Clause> = values
            .iter()
            .map(|value| build_value_query(schema, key, value))
            .collect();
        facet_queries.insert(key.clone(), Clause::Should(clauses));
    }
    facet_queries
}

/// The text-search clause for the request, if a text query was applied.
pub fn build_text_query(schema: &FilterSchema, applied: &AppliedFilters) -> Option<Clause> {
    let values = applied.get(schema.text_search_key())?;
    let value = values.iter().next()?;
    Some(build_value_query(schema, schema.text_search_key(), value))
}

/// ANDs the text clause and all facet clause groups together. With nothing
/// to combine this degenerates to match-all, which keeps count and
/// pagination math correct for the unfiltered home listing.
pub fn build_root_query(facet_queries: &BTreeMap<String, Clause>, text_query: Option<&Clause>) -> Clause {
    let mut conjunction = Vec::new();
    if let Some(text_query) = text_query {
        conjunction.push(text_query.clone());
    }
    if !facet_queries.is_empty() {
        conjunction.push(Clause::Must(facet_queries.values().cloned().collect()));
    }
    if conjunction.is_empty() {
        Clause::MatchAll
    } else {
        Clause::Must(conjunction)
    }
}

/// A self-excluding, size-bounded terms aggregation for one facet key.
///
/// `query` is the root query rebuilt with this key's own facet clause left
/// out, so the facet's counts reflect what selecting a different value
/// would do under the *other* active filters.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationRequest {
    pub key: String,
    pub query: Clause,
    pub size: u64,
}

impl AggregationRequest {
    /// Serializes as a global-scoped filter wrapping a terms aggregation,
    /// so bucket counts are independent of the hit window.
    pub fn to_json(&self) -> Value {
        let mut terms = Map::new();
        terms.insert(
            self.key.clone(),
            json!({"terms": {"field": self.key, "size": self.size}}),
        );
        json!({
            "global": {},
            "filter": self.query.to_json(),
            "aggregations": terms,
        })
    }

    /// Name of this aggregation in the search request and response.
    pub fn response_key(&self) -> String {
        format!("{}_filter", self.key)
    }
}

/// One aggregation request per aggregatable schema definition, each with its
/// own facet query excluded.
pub fn build_aggregations(
    schema: &FilterSchema,
    facet_queries: &BTreeMap<String, Clause>,
    text_query: Option<&Clause>,
) -> BTreeMap<String, AggregationRequest> {
    let mut aggregations = BTreeMap::new();
    for definition in schema.aggregatable_definitions() {
        let mut remaining = facet_queries.clone();
        remaining.remove(&definition.key);
        aggregations.insert(
            definition.key.clone(),
            AggregationRequest {
                key: definition.key.clone(),
                query: build_root_query(&remaining, text_query),
                size: MAX_FACET_BUCKETS,
            },
        );
    }
    aggregations
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::sanitize::sanitize;
    use crate::schema::default_catalog_schema;
    use std::collections::BTreeMap as Params;

    fn applied(pairs: &[(&str, &str)]) -> AppliedFilters {
        let schema = default_catalog_schema().unwrap();
        let params: Params<String, String> = pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        sanitize(&schema, &params).unwrap()
    }

    #[test]
    fn empty_input_degenerates_to_match_all() {
        let root = build_root_query(&BTreeMap::new(), None);
        assert!(root.is_match_all());
        assert_eq!(root.to_json(), json!({"match_all": {}}));
    }

    #[test]
    fn non_empty_input_never_returns_match_all() {
        let schema = default_catalog_schema().unwrap();
        let applied = applied(&[("gender", "male")]);
        let facet_queries = build_facet_queries(&schema, &applied);
        let root = build_root_query(&facet_queries, None);
        assert!(!root.is_match_all());

        let text = build_value_query(&schema, "q", "apple");
        let root = build_root_query(&BTreeMap::new(), Some(&text));
        assert!(!root.is_match_all());
    }

    #[test]
    fn text_query_ors_name_and_phrase() {
        let schema = default_catalog_schema().unwrap();
        let clause = build_value_query(&schema, "q", "hello world");
        let json = clause.to_json();
        let should = json["bool"]["should"].as_array().unwrap();
        assert_eq!(should.len(), 2);
        assert_eq!(should[0]["match"]["name"]["fuzziness"], "AUTO");
        assert_eq!(should[1]["match_phrase"]["phrase"]["query"], "hello world");
    }

    #[test]
    fn multi_value_facet_is_a_disjunction() {
        let schema = default_catalog_schema().unwrap();
        let applied = applied(&[("gender", "male,female")]);
        let facet_queries = build_facet_queries(&schema, &applied);
        let clause = facet_queries.get("gender").unwrap();
        let json = clause.to_json();
        let should = json["bool"]["should"].as_array().unwrap();
        assert_eq!(should.len(), 2);
        assert_eq!(should[0]["term"]["gender"]["value"], "female");
        assert_eq!(should[1]["term"]["gender"]["value"], "male");
    }

    #[test]
    fn text_key_never_becomes_a_facet_query() {
        let schema = default_catalog_schema().unwrap();
        let applied = applied(&[("q", "apple"), ("gender", "male")]);
        let facet_queries = build_facet_queries(&schema, &applied);
        assert_eq!(facet_queries.len(), 1);
        assert!(facet_queries.contains_key("gender"));
    }

    #[test]
    fn aggregations_exclude_their_own_facet_for_every_key() {
        let schema = default_catalog_schema().unwrap();
        let applied = applied(&[("gender", "male"), ("species", "cat"), ("game", "classic")]);
        let facet_queries = build_facet_queries(&schema, &applied);
        let aggregations = build_aggregations(&schema, &facet_queries, None);

        for (key, request) in &aggregations {
            let own_clause = facet_queries.get(key);
            let serialized = request.query.to_json().to_string();
            if let Some(own_clause) = own_clause {
                // The aggregation query must not contain this key's own
                // facet clause, but must still contain the others.
                assert!(
                    !serialized.contains(&own_clause.to_json().to_string()),
                    "aggregation for '{}' includes its own facet query",
                    key
                );
            }
            for (other_key, other_clause) in &facet_queries {
                if other_key != key {
                    assert!(
                        serialized.contains(&other_clause.to_json().to_string()),
                        "aggregation for '{}' lost the facet query for '{}'",
                        key,
                        other_key
                    );
                }
            }
        }
    }

    #[test]
    fn aggregation_with_no_other_filters_scopes_to_match_all() {
        let schema = default_catalog_schema().unwrap();
        let applied = applied(&[("gender", "male")]);
        let facet_queries = build_facet_queries(&schema, &applied);
        let aggregations = build_aggregations(&schema, &facet_queries, None);
        assert!(aggregations.get("gender").unwrap().query.is_match_all());
        assert!(!aggregations.get("species").unwrap().query.is_match_all());
    }

    #[test]
    fn aggregation_request_wraps_a_bounded_terms_aggregation() {
        let schema = default_catalog_schema().unwrap();
        let aggregations = build_aggregations(&schema, &BTreeMap::new(), None);
        let request = aggregations.get("gender").unwrap();
        assert_eq!(request.response_key(), "gender_filter");
        let json = request.to_json();
        assert_eq!(json["aggregations"]["gender"]["terms"]["field"], "gender");
        assert_eq!(json["aggregations"]["gender"]["terms"]["size"], 50);
        assert!(json.get("global").is_some());
    }
}
