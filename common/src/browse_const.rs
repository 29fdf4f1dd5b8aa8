//! Shared constants for the browse engine.

/// Number of results per browse page.
pub const PAGE_SIZE: u64 = 25;

/// Longest free-text query we accept, in characters.
pub const MAX_QUERY_LENGTH: usize = 64;

/// Upper bound on terms-aggregation bucket counts requested per facet.
pub const MAX_FACET_BUCKETS: u64 = 50;

/// Served when an entity has no image of its own.
pub const IMAGE_NOT_AVAILABLE: &str = "/images/image-not-available-thumb.svg";
