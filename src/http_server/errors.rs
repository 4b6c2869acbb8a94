//! # HTTP Server Errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::router::RouteError;

/// Result type for server setup
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors loading configuration or running the server
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse config file {path}: {reason}")]
    ConfigParse { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to build routes: {0}")]
    Routes(#[from] RouteError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("Server I/O error: {0}")]
    Io(#[from] io::Error),
}
