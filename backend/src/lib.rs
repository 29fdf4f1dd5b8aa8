//! Faceted catalog browse engine and its HTTP surface.

pub mod api;
pub mod browse;
pub mod config;
pub mod entity_store;
pub mod error;
pub mod index_client;
pub mod schema;
pub mod state;
