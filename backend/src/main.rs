//! Server entry point.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use backend::config::Config;
use backend::entity_store::RedisEntityStore;
use backend::index_client::HttpSearchIndex;
use backend::schema::default_catalog_schema;
use backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();
    let schema = Arc::new(default_catalog_schema()?);
    let index = Arc::new(HttpSearchIndex::new(&config)?);
    let store = Arc::new(RedisEntityStore::connect(&config).await?);
    let state = AppState {
        schema,
        index,
        store,
    };

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    info!("listening on {}", config.bind_address);
    axum::serve(listener, backend::api::router(state)).await?;
    Ok(())
}
