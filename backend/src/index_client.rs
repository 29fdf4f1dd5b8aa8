//! Client for the external full-text/aggregation index.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;

use crate::browse::query::{AggregationRequest, Clause};
use crate::config::Config;
use crate::error::{BrowseError, Result};

/// One page-of-hits request: the root query plus every facet's
/// self-excluding aggregation, windowed by `from`/`size`.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub from: u64,
    pub size: u64,
    pub query: Clause,
    pub aggregations: BTreeMap<String, AggregationRequest>,
}

impl SearchRequest {
    pub fn to_json(&self) -> Value {
        let mut aggregations = Map::new();
        for request in self.aggregations.values() {
            aggregations.insert(request.response_key(), request.to_json());
        }
        json!({
            "from": self.from,
            "size": self.size,
            // Relevance first, entity id as the stable tiebreak.
            "sort": [{"_score": "desc"}, {"id": "asc"}],
            "query": self.query.to_json(),
            "aggregations": aggregations,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawSearchHit {
    pub id: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawTermsAggregation {
    pub buckets: Vec<RawAggregationBucket>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAggregationBucket {
    pub key: String,
    pub doc_count: u64,
}

/// The `{key}_filter` level of the aggregation response; holds the inner
/// terms aggregation keyed by the facet name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct RawFilterAggregation {
    pub facets: BTreeMap<String, RawTermsAggregation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RawSearchResponse {
    pub hits: Vec<RawSearchHit>,
    #[serde(default)]
    pub aggregations: BTreeMap<String, RawFilterAggregation>,
}

#[derive(Debug, Deserialize)]
struct RawCountResponse {
    count: u64,
}

#[derive(Debug, Deserialize)]
struct RawSuggestResponse {
    suggestions: Vec<String>,
}

/// The two (plus suggest) outbound operations the browse engine needs from
/// the index. Behind a trait so tests can count calls and fake responses.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    async fn count(&self, query: &Clause) -> Result<u64>;
    async fn search(&self, request: &SearchRequest) -> Result<RawSearchResponse>;
    async fn suggest(&self, prefix: &str, size: u64) -> Result<Vec<String>>;
}

/// JSON-over-HTTP implementation. Failures are surfaced as
/// `IndexUnavailable` and never retried here; retry policy, if any, belongs
/// to the index deployment.
pub struct HttpSearchIndex {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSearchIndex {
    pub fn new(config: &Config) -> Result<HttpSearchIndex> {
        let client = reqwest::Client::builder()
            .timeout(config.index_timeout)
            .build()?;
        Ok(HttpSearchIndex {
            client,
            base_url: config.index_url.trim_end_matches('/').to_string(),
        })
    }

    async fn post_json(&self, path: &str, body: Value) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);
        let response = self.client.post(url).json(&body).send().await?;
        let status = response.status();
        let response_txt = response.text().await?;
        if status.is_client_error() || status.is_server_error() {
            return Err(BrowseError::IndexUnavailable(format!(
                "{}: {}",
                status, response_txt
            )));
        }
        debug!("index response: len = {}", response_txt.len());
        Ok(response_txt)
    }
}

#[async_trait]
impl SearchIndex for HttpSearchIndex {
    async fn count(&self, query: &Clause) -> Result<u64> {
        let body = json!({"query": query.to_json()});
        let response_txt = self.post_json("/catalog/_count", body).await?;
        let response: RawCountResponse = serde_json::from_str(&response_txt)
            .map_err(|err| BrowseError::IndexUnavailable(err.to_string()))?;
        Ok(response.count)
    }

    async fn search(&self, request: &SearchRequest) -> Result<RawSearchResponse> {
        let response_txt = self
            .post_json("/catalog/_search", request.to_json())
            .await?;
        let response: RawSearchResponse = serde_json::from_str(&response_txt)
            .map_err(|err| BrowseError::IndexUnavailable(err.to_string()))?;
        Ok(response)
    }

    async fn suggest(&self, prefix: &str, size: u64) -> Result<Vec<String>> {
        let body = json!({"prefix": prefix, "size": size});
        let response_txt = self.post_json("/catalog/_suggest", body).await?;
        let response: RawSuggestResponse = serde_json::from_str(&response_txt)
            .map_err(|err| BrowseError::IndexUnavailable(err.to_string()))?;
        Ok(response.suggestions)
    }
}
