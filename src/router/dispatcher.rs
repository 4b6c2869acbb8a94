//! # Dispatcher
//!
//! Ordered route table. Routes are tried in registration order and the
//! first whose pattern matches the whole path and whose method equals the
//! request method handles it. Handlers run inside `catch_unwind`, so a
//! failing or panicking handler always yields a response.

use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use axum::extract::Query;
use axum::http::{Method, StatusCode, Uri};
use tracing::{debug, error, info_span, warn};
use uuid::Uuid;

use super::errors::{RouteError, RouteResult};
use super::exchange::{Exchange, QueryParams, Request, Response};
use super::route::{path_params, Route};
use crate::codec::BodyParams;

/// Ordered `(pattern, method) -> handler` table over shared state `S`
pub struct Router<S> {
    routes: Vec<Route<S>>,
}

impl<S> Default for Router<S> {
    fn default() -> Self {
        Self { routes: Vec::new() }
    }
}

impl<S> fmt::Debug for Router<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.routes.iter()).finish()
    }
}

impl<S> Router<S> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a route. Earlier routes take precedence.
    pub fn route<F>(mut self, pattern: &str, method: Method, handler: F) -> RouteResult<Self>
    where
        F: Fn(&S, &mut Exchange) -> RouteResult<()> + Send + Sync + 'static,
    {
        self.routes
            .push(Route::new(pattern, method, Box::new(handler))?);
        Ok(self)
    }

    pub fn routes(&self) -> &[Route<S>] {
        &self.routes
    }

    /// Handle one request end to end. Never fails: errors become status codes.
    pub fn dispatch(&self, state: &S, request: &Request) -> Response {
        let request_id = Uuid::new_v4();
        let span = info_span!(
            "dispatch",
            %request_id,
            method = %request.method,
            path = request.uri.path(),
        );
        let _entered = span.enter();

        let response = self.handle(state, request);
        debug!(status = response.status.as_u16(), "dispatched");
        response
    }

    fn handle(&self, state: &S, request: &Request) -> Response {
        let path = request.uri.path();
        let Some((route, captures)) = self
            .routes
            .iter()
            .find_map(|route| route.matches(&request.method, path).map(|c| (route, c)))
        else {
            debug!("no route matched");
            return Response::empty(StatusCode::NOT_FOUND);
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| -> RouteResult<Response> {
            let mut exchange = Exchange::new(
                path_params(&captures)?,
                parse_query(&request.uri)?,
                BodyParams::parse(&request.body)?,
            );
            (route.handler())(state, &mut exchange)?;
            Ok(exchange.into_response())
        }));

        match outcome {
            Ok(Ok(response)) => response,
            Ok(Err(err)) => {
                let status = err.status_code();
                if status.is_server_error() {
                    error!(error = %err, pattern = route.pattern(), "handler failed");
                } else {
                    warn!(error = %err, pattern = route.pattern(), "request rejected");
                }
                Response::empty(status)
            }
            Err(_) => {
                error!(pattern = route.pattern(), "handler panicked");
                Response::empty(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

/// URL-decoded query pairs. A repeated key keeps its last value.
fn parse_query(uri: &Uri) -> RouteResult<QueryParams> {
    let Query(pairs) = Query::<HashMap<String, String>>::try_from_uri(uri)
        .map_err(|e| RouteError::InvalidQuery(e.body_text()))?;
    Ok(QueryParams::new(pairs))
}
