//! The faceted browse engine: sanitization, query construction, pagination
//! and result assembly.

pub mod sanitize;
pub use sanitize::{parse_positive_integer, sanitize};

pub mod query;

pub mod pagination;
pub use pagination::compute_page_state;

pub mod assemble;
pub use assemble::browse;
