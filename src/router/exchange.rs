//! # Exchange
//!
//! The request parameters handed to a handler and the response it builds.

use std::collections::HashMap;
use std::fmt::Display;
use std::fmt::Write as _;

use axum::body::Bytes;
use axum::http::{Method, StatusCode, Uri};
use chrono::NaiveDateTime;
use serde::Serialize;

use super::errors::{RouteError, RouteResult};
use crate::codec::{parse_date_time, to_json, BodyParams};
use crate::store::Id;

/// An inbound request as seen by the router
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub uri: Uri,
    pub body: Bytes,
}

impl Request {
    pub fn new(method: Method, uri: Uri, body: impl Into<Bytes>) -> Self {
        Self {
            method,
            uri,
            body: body.into(),
        }
    }
}

/// The outcome of dispatching a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    /// Set only for 2xx responses
    pub content_type: Option<&'static str>,
    pub body: Vec<u8>,
}

impl Response {
    /// A response with no body and no content type.
    pub fn empty(status: StatusCode) -> Self {
        Self {
            status,
            content_type: None,
            body: Vec::new(),
        }
    }

    pub fn body_str(&self) -> &str {
        std::str::from_utf8(&self.body).unwrap_or_default()
    }
}

/// Decoded query-string parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: HashMap<String, String>,
}

impl QueryParams {
    pub fn new(pairs: HashMap<String, String>) -> Self {
        Self { pairs }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs.get(key).map(String::as_str)
    }

    pub fn require(&self, key: &str) -> RouteResult<&str> {
        self.get(key)
            .ok_or_else(|| RouteError::missing(format!("query parameter {}", key)))
    }

    pub fn require_id(&self, key: &str) -> RouteResult<Id> {
        let raw = self.require(key)?;
        raw.parse()
            .map_err(|_| RouteError::validation(format!("{} must be an integer, got {:?}", key, raw)))
    }

    pub fn require_date_time(&self, key: &str) -> RouteResult<NaiveDateTime> {
        Ok(parse_date_time(self.require(key)?)?)
    }
}

/// Handler context: path/query/body parameters plus the response builder.
#[derive(Debug)]
pub struct Exchange {
    pub path_params: Vec<Id>,
    pub query: QueryParams,
    pub body: BodyParams,
    status: StatusCode,
    out: String,
}

impl Exchange {
    pub fn new(path_params: Vec<Id>, query: QueryParams, body: BodyParams) -> Self {
        Self {
            path_params,
            query,
            body,
            status: StatusCode::OK,
            out: String::new(),
        }
    }

    /// Positional path capture.
    pub fn path_param(&self, index: usize) -> RouteResult<Id> {
        self.path_params
            .get(index)
            .copied()
            .ok_or_else(|| RouteError::missing(format!("path parameter {}", index)))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) -> &mut Self {
        self.status = status;
        self
    }

    pub fn append(&mut self, value: impl Display) -> &mut Self {
        let _ = write!(self.out, "{}", value);
        self
    }

    /// Append `value` encoded as JSON.
    pub fn append_json<T: Serialize + ?Sized>(&mut self, value: &T) -> RouteResult<&mut Self> {
        let encoded = to_json(value)?;
        self.out.push_str(&encoded);
        Ok(self)
    }

    pub fn written(&self) -> &str {
        &self.out
    }

    pub fn into_response(self) -> Response {
        let content_type = self.status.is_success().then_some("application/json");
        Response {
            status: self.status,
            content_type,
            body: self.out.into_bytes(),
        }
    }
}
