//! Observability for viewdb
//!
//! Structured logging through `tracing`. Requests are traced by the
//! `tower-http` layer in the HTTP server and by a per-dispatch span carrying
//! a request id; store operations emit `debug!` events with entity kind and
//! identifier fields.

mod logger;

pub use logger::{build_filter, init_logging, LoggingError};
