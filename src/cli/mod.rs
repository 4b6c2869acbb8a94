//! CLI module for viewdb
//!
//! Provides command-line interface for:
//! - serve: Run the viewing scheduler HTTP server
//! - check-config: Validate a configuration file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, ServeArgs};
pub use commands::{
    check_config, check_config_to, resolve_config, run, run_command, serve, DEFAULT_CONFIG_PATH,
};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::write_response_to;
