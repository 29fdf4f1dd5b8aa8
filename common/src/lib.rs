//! Common library exports shared between the browse engine and its consumers.

extern crate serde;


pub mod filter_schema;
pub mod browse_query;
pub mod browse_result;
pub mod browse_const;
