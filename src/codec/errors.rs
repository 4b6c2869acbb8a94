//! # Codec Errors

use thiserror::Error;

/// Result type for codec operations
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors decoding request payloads or encoding responses
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// Body is not valid JSON
    #[error("Invalid JSON body: {0}")]
    InvalidJson(String),

    /// Body is valid JSON but not an object
    #[error("Body must be a JSON object")]
    NotAnObject,

    /// Required field absent
    #[error("Missing field: {0}")]
    MissingField(String),

    /// Field present with the wrong JSON type
    #[error("Field {field} must be {expected}")]
    WrongType {
        field: String,
        expected: &'static str,
    },

    /// Unparseable ISO-8601 local date-time
    #[error("Invalid date-time: {0}")]
    InvalidDateTime(String),

    /// Response could not be serialised
    #[error("Encoding failed: {0}")]
    Encode(String),
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Encode(e.to_string())
    }
}
