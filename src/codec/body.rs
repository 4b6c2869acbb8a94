//! Request body decoding into a flat key/value map.

use chrono::NaiveDateTime;
use serde_json::{Map, Value};

use super::datetime::parse_date_time;
use super::errors::{CodecError, CodecResult};
use crate::store::Id;

/// Decoded body parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BodyParams {
    fields: Map<String, Value>,
}

impl BodyParams {
    /// Decode a request body. An empty (or blank) body yields no parameters.
    pub fn parse(bytes: &[u8]) -> CodecResult<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value =
            serde_json::from_slice(bytes).map_err(|e| CodecError::InvalidJson(e.to_string()))?;
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            _ => Err(CodecError::NotAnObject),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn require(&self, key: &str) -> CodecResult<&Value> {
        match self.fields.get(key) {
            None | Some(Value::Null) => Err(CodecError::MissingField(key.to_string())),
            Some(value) => Ok(value),
        }
    }

    pub fn require_str(&self, key: &str) -> CodecResult<&str> {
        self.require(key)?.as_str().ok_or_else(|| CodecError::WrongType {
            field: key.to_string(),
            expected: "a string",
        })
    }

    pub fn require_id(&self, key: &str) -> CodecResult<Id> {
        self.require(key)?.as_u64().ok_or_else(|| CodecError::WrongType {
            field: key.to_string(),
            expected: "a non-negative integer",
        })
    }

    pub fn require_bool(&self, key: &str) -> CodecResult<bool> {
        self.require(key)?.as_bool().ok_or_else(|| CodecError::WrongType {
            field: key.to_string(),
            expected: "a boolean",
        })
    }

    pub fn require_date_time(&self, key: &str) -> CodecResult<NaiveDateTime> {
        parse_date_time(self.require_str(key)?)
    }
}
