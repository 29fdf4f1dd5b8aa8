//! Error taxonomy for the browse engine.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

/// Every failure a browse request can surface. Client-invalid input maps to
/// 400; everything else maps to 500 with a non-leaking message. External
/// calls are not retried at this layer.
#[derive(Debug, thiserror::Error)]
pub enum BrowseError {
    /// A filter value failed schema validation. With a trusted schema this
    /// indicates a programming mismatch, so it is fatal to the request.
    #[error("invalid filter value: {0}")]
    Validation(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("search index unavailable: {0}")]
    IndexUnavailable(String),

    #[error("entity store unavailable: {0}")]
    StoreUnavailable(String),
}

pub type Result<T> = std::result::Result<T, BrowseError>;

impl From<reqwest::Error> for BrowseError {
    fn from(err: reqwest::Error) -> Self {
        BrowseError::IndexUnavailable(err.to_string())
    }
}

impl From<redis::RedisError> for BrowseError {
    fn from(err: redis::RedisError) -> Self {
        BrowseError::StoreUnavailable(err.to_string())
    }
}

impl IntoResponse for BrowseError {
    fn into_response(self) -> Response {
        match self {
            BrowseError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, message).into_response()
            }
            other => {
                error!("browse request failed: {}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}
