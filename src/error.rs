//! Error types for the profile service
//!
//! `Error` is what callers of the record stores see. `CacheError` is the
//! cache-side failure kind; the cached store absorbs it and never lets it
//! reach a caller.

use std::time::Duration;

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Error Enum ==
/// Failure kinds surfaced by record store operations.
#[derive(Error, Debug)]
pub enum Error {
    /// No profile exists with the given identifier
    #[error("Profile not found: {0}")]
    NotFound(i64),

    /// The durable store could not complete the query
    #[error("Store failure: {0}")]
    StoreFailure(#[from] sqlx::Error),

    /// Malformed request data that has no safe default
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A stored `date_joined` value is not an ISO `YYYY-MM-DD` date
    #[error("Invalid date format for profile {id}: {value:?}")]
    InvalidDateFormat { id: i64, value: String },
}

// == Cache Error Enum ==
/// Failures reported by a cache backend. Distinct from a miss.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Transport or server error from the backend
    #[error("Cache backend error: {0}")]
    Backend(String),

    /// The backend did not answer within the configured bound
    #[error("Cache operation timed out after {0:?}")]
    Timeout(Duration),

    /// Cached bytes could not be encoded or decoded
    #[error("Cache codec error: {0}")]
    Codec(#[from] serde_json::Error),

    #[error("Key exceeds maximum length of {0} bytes")]
    KeyTooLong(usize),

    #[error("Value exceeds maximum size of {0} bytes")]
    ValueTooLarge(usize),
}

impl From<redis::RedisError> for CacheError {
    fn from(err: redis::RedisError) -> Self {
        CacheError::Backend(err.to_string())
    }
}

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::InvalidInput(rejection.body_text())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
            // Corrupted rows are a store-side fault, reported like a failed query.
            Error::StoreFailure(_) | Error::InvalidDateFormat { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Aliases ==
/// Convenience Result type for record store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Result type for cache backend operations.
pub type CacheResult<T> = std::result::Result<T, CacheError>;
