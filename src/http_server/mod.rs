//! # HTTP Server Module
//!
//! Serves the scheduler's route table over HTTP with axum. The axum router
//! has no routes of its own; a fallback hands every request to
//! [`crate::router::Router`], which keeps the ordered first-match semantics.

pub mod config;
pub mod errors;
pub mod server;

pub use config::ServerConfig;
pub use errors::{ServerError, ServerResult};
pub use server::HttpServer;
