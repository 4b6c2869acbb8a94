//! CLI command implementations
//!
//! - serve: resolve configuration, initialise logging, run the HTTP server
//! - check-config: validate a configuration file and echo it back

use std::io::{self, Write};
use std::path::Path;

use super::args::{Command, ServeArgs};
use super::errors::{CliError, CliResult};
use super::io::write_response_to;
use crate::http_server::{HttpServer, ServerConfig};
use crate::observability::init_logging;

/// Config file picked up by `serve` when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "./viewdb.json";

/// Main entry point for CLI
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Serve(args) => serve(&args),
        Command::CheckConfig { config } => check_config(&config),
    }
}

/// Effective server configuration for `serve`.
///
/// An explicit `--config` must exist. Without one, the default path is used
/// if present and built-in defaults otherwise. Flags win over file values.
pub fn resolve_config(args: &ServeArgs) -> CliResult<ServerConfig> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.exists() {
                ServerConfig::load(default_path)?
            } else {
                ServerConfig::default()
            }
        }
    };

    if let Some(host) = &args.host {
        config.host = host.clone();
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(slot_policy) = args.slot_policy {
        config.slot_policy = slot_policy;
    }

    config.validate()?;
    Ok(config)
}

/// Start the HTTP server and block until it shuts down
pub fn serve(args: &ServeArgs) -> CliResult<()> {
    let config = resolve_config(args)?;
    init_logging(&config.log_level)?;

    let server = HttpServer::with_config(config)?;

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(server.start())?;

    Ok(())
}

/// Validate a config file and print the effective configuration
pub fn check_config(config_path: &Path) -> CliResult<()> {
    check_config_to(config_path, &mut io::stdout())
}

/// [`check_config`] writing to `out` instead of stdout
pub fn check_config_to<W: Write>(config_path: &Path, out: &mut W) -> CliResult<()> {
    let config = ServerConfig::load(config_path)?;
    write_response_to(out, serde_json::to_value(&config)?)
}
