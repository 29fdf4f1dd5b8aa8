//! Process configuration, read once at startup.

use std::time::Duration;

/// Immutable configuration injected into the app state at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub index_url: String,
    pub redis_url: String,
    pub index_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Config {
        let timeout_ms = std::env::var("SEARCH_INDEX_TIMEOUT_MS")
            .ok()
            .and_then(|raw| raw.parse::<u64>().ok())
            .unwrap_or(60_000);
        Config {
            bind_address: std::env::var("BIND_ADDRESS").unwrap_or("0.0.0.0:3000".to_string()),
            index_url: std::env::var("SEARCH_INDEX_URL")
                .unwrap_or("http://127.0.0.1:9200".to_string()),
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or("redis://127.0.0.1:6379".to_string()),
            index_timeout: Duration::from_millis(timeout_ms),
        }
    }
}
