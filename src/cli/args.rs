//! CLI argument definitions using clap
//!
//! Commands:
//! - viewdb serve [--config <path>] [--host <host>] [--port <port>] [--slot-policy <policy>]
//! - viewdb check-config --config <path>

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::scheduler::SlotPolicyKind;

/// viewdb - flat viewing scheduler backed by a transactional in-memory store
#[derive(Parser, Debug)]
#[command(name = "viewdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Validate a configuration file and print the effective settings
    CheckConfig {
        /// Path to configuration file
        #[arg(long, default_value = "./viewdb.json")]
        config: PathBuf,
    },
}

/// Options for `serve`. Flags override values from the config file.
#[derive(Args, Debug, Default, Clone)]
pub struct ServeArgs {
    /// Path to configuration file (default: ./viewdb.json if present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to
    #[arg(long)]
    pub port: Option<u16>,

    /// Rules a reservation slot must satisfy
    #[arg(long, value_enum)]
    pub slot_policy: Option<SlotPolicyKind>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::try_parse_from([
            "viewdb",
            "serve",
            "--port",
            "9000",
            "--slot-policy",
            "upcoming_week",
        ])
        .unwrap();
        match cli.command {
            Command::Serve(args) => {
                assert_eq!(args.port, Some(9000));
                assert_eq!(args.slot_policy, Some(SlotPolicyKind::UpcomingWeek));
                assert!(args.config.is_none());
                assert!(args.host.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_check_config_default_path() {
        let cli = Cli::try_parse_from(["viewdb", "check-config"]).unwrap();
        match cli.command {
            Command::CheckConfig { config } => assert_eq!(config, PathBuf::from("./viewdb.json")),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_rejects_unknown_policy() {
        assert!(Cli::try_parse_from(["viewdb", "serve", "--slot-policy", "weekends"]).is_err());
    }
}
