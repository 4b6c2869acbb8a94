//! # Router
//!
//! A small request router independent of the HTTP server. Routes are
//! `(regex, method, handler)` triples kept in registration order; the
//! dispatcher turns every outcome, including handler panics, into a
//! status code and an optional JSON body.
//!
//! | Outcome                                  | Status |
//! |------------------------------------------|--------|
//! | No route matches                         | 404    |
//! | Handler returns normally                 | handler-chosen, default 200 |
//! | Constraint violation, bad input          | 400    |
//! | Anything else, including panics          | 500    |
//!
//! Only 2xx responses carry `Content-type: application/json`; an empty
//! response body is never written.

mod dispatcher;
mod errors;
mod exchange;
mod route;

pub use dispatcher::Router;
pub use errors::{RouteError, RouteResult};
pub use exchange::{Exchange, QueryParams, Request, Response};
pub use route::{path_params, Handler, Route};
