//! Process-wide `tracing` subscriber setup.

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Errors installing the log subscriber
#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Invalid log filter {filter:?}: {reason}")]
    InvalidFilter { filter: String, reason: String },

    #[error("Failed to install log subscriber: {0}")]
    Install(String),
}

/// Filter from `RUST_LOG` when set, otherwise `default_filter`.
pub fn build_filter(rust_log: Option<&str>, default_filter: &str) -> Result<EnvFilter, LoggingError> {
    let directives = rust_log
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default_filter);
    EnvFilter::try_new(directives).map_err(|e| LoggingError::InvalidFilter {
        filter: directives.to_string(),
        reason: e.to_string(),
    })
}

/// Install the global fmt subscriber. Call once at startup.
pub fn init_logging(default_filter: &str) -> Result<(), LoggingError> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(rust_log.as_deref(), default_filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .try_init()
        .map_err(|e| LoggingError::Install(e.to_string()))
}
