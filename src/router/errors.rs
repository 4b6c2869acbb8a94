//! # Router Errors
//!
//! Everything a handler can fail with, and the status code each maps to.

use axum::http::StatusCode;
use thiserror::Error;

use crate::codec::CodecError;
use crate::store::StoreError;

/// Result type for handlers and route registration
pub type RouteResult<T> = Result<T, RouteError>;

/// Handler and dispatch errors
#[derive(Debug, Clone, Error)]
pub enum RouteError {
    // ==================
    // Client Errors (400)
    // ==================
    /// Constraint violation or rejected transition from the store
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Undecodable body or unparseable value
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Input decoded fine but is outside what the business rules accept
    #[error("Validation failed: {0}")]
    Validation(String),

    /// A required parameter or referenced entity is absent
    #[error("Missing value: {0}")]
    MissingValue(String),

    /// A path capture is not an integer
    #[error("Invalid path parameter: {0}")]
    InvalidPathParam(String),

    /// The query string could not be decoded
    #[error("Invalid query string: {0}")]
    InvalidQuery(String),

    // ==================
    // Server Errors (500)
    // ==================
    /// Route pattern failed to compile at registration
    #[error("Invalid route pattern {pattern}: {reason}")]
    InvalidPattern { pattern: String, reason: String },

    /// Anything unanticipated
    #[error("Internal error: {0}")]
    Internal(String),
}

impl RouteError {
    /// Get HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            RouteError::Store(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            RouteError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,

            RouteError::Codec(CodecError::Encode(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            RouteError::Codec(_) => StatusCode::BAD_REQUEST,

            RouteError::Validation(_)
            | RouteError::MissingValue(_)
            | RouteError::InvalidPathParam(_)
            | RouteError::InvalidQuery(_) => StatusCode::BAD_REQUEST,

            RouteError::InvalidPattern { .. } | RouteError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        RouteError::Validation(msg.into())
    }

    pub fn missing(what: impl Into<String>) -> Self {
        RouteError::MissingValue(what.into())
    }
}
