//! Route table entries.

use std::fmt;

use axum::http::Method;
use regex::{Captures, Regex};

use super::errors::{RouteError, RouteResult};
use super::exchange::Exchange;
use crate::store::Id;

/// A boxed request handler over shared state `S`
pub type Handler<S> = Box<dyn Fn(&S, &mut Exchange) -> RouteResult<()> + Send + Sync>;

/// One registered `(pattern, method, handler)` entry
pub struct Route<S> {
    pattern: Regex,
    source: String,
    method: Method,
    handler: Handler<S>,
}

impl<S> Route<S> {
    /// Compile `pattern` so that it must match the entire path.
    pub fn new(pattern: &str, method: Method, handler: Handler<S>) -> RouteResult<Self> {
        let anchored = format!("^(?:{})$", pattern);
        let compiled = Regex::new(&anchored).map_err(|e| RouteError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern: compiled,
            source: pattern.to_string(),
            method,
            handler,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.source
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full-path match for the given method.
    pub fn matches<'p>(&self, method: &Method, path: &'p str) -> Option<Captures<'p>> {
        if &self.method != method {
            return None;
        }
        self.pattern.captures(path)
    }

    pub fn handler(&self) -> &Handler<S> {
        &self.handler
    }
}

impl<S> fmt::Debug for Route<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("pattern", &self.source)
            .field("method", &self.method)
            .finish_non_exhaustive()
    }
}

/// Every capture group, in order, parsed as an identifier.
///
/// A group that did not participate in the match counts as an empty
/// capture and fails like any other non-integer.
pub fn path_params(captures: &Captures<'_>) -> RouteResult<Vec<Id>> {
    captures
        .iter()
        .skip(1)
        .map(|group| {
            let raw = group.map(|m| m.as_str()).unwrap_or_default();
            raw.parse::<Id>()
                .map_err(|_| RouteError::InvalidPathParam(raw.to_string()))
        })
        .collect()
}
