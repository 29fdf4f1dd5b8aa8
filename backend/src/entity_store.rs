//! Batched access to canonical catalog entity records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::Config;
use crate::error::Result;

/// Canonical entity record as stored, keyed by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntity {
    pub id: String,
    pub entity_type: String,
    pub name: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Bulk entity lookup. One batched call per browse request regardless of
/// page size; the result is order-preserving with `None` for ids that no
/// longer resolve (index and store are not guaranteed consistent).
#[async_trait]
pub trait EntityStore: Send + Sync {
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Option<CatalogEntity>>>;
}

/// Redis-backed store: entity records live at `entity:{id}` as JSON blobs.
pub struct RedisEntityStore {
    connection: redis::aio::ConnectionManager,
}

impl RedisEntityStore {
    pub async fn connect(config: &Config) -> Result<RedisEntityStore> {
        let client = redis::Client::open(config.redis_url.as_str())?;
        let connection = client.get_connection_manager().await?;
        Ok(RedisEntityStore { connection })
    }
}

#[async_trait]
impl EntityStore for RedisEntityStore {
    async fn get_by_ids(&self, ids: &[String]) -> Result<Vec<Option<CatalogEntity>>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let keys: Vec<String> = ids.iter().map(|id| format!("entity:{}", id)).collect();
        let mut connection = self.connection.clone();
        let raw_records: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut connection)
            .await?;
        let entities = raw_records
            .into_iter()
            .zip(ids)
            .map(|(raw, id)| match raw {
                Some(raw) => match serde_json::from_str::<CatalogEntity>(&raw) {
                    Ok(entity) => Some(entity),
                    Err(err) => {
                        // A corrupt record is treated like a missing one.
                        warn!("unparseable entity record for '{}': {}", id, err);
                        None
                    }
                },
                None => None,
            })
            .collect();
        Ok(entities)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_record_parses_with_and_without_image() {
        let entity: CatalogEntity = serde_json::from_str(
            r#"{"id": "apple", "entity_type": "villager", "name": "Apple"}"#,
        )
        .unwrap();
        assert_eq!(entity.image_url, None);

        let entity: CatalogEntity = serde_json::from_str(
            r#"{"id": "apple", "entity_type": "villager", "name": "Apple",
                "image_url": "/images/villagers/apple-thumb.png"}"#,
        )
        .unwrap();
        assert_eq!(
            entity.image_url.as_deref(),
            Some("/images/villagers/apple-thumb.png")
        );
    }
}
