//! HTTP Server Configuration
//!
//! Bind address, log level and the reservation slot rules. Every field has
//! a default, so an empty JSON object is a valid configuration.

use std::fs;
use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::errors::{ServerError, ServerResult};
use crate::scheduler::SlotPolicyKind;

/// Longest accepted notice; anything above can never fit the bookable week.
pub const MAX_MIN_NOTICE_HOURS: u32 = 7 * 24;

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to (default: "0.0.0.0")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8081)
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log filter used when RUST_LOG is unset (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Which slot rules reservations must satisfy
    #[serde(default)]
    pub slot_policy: SlotPolicyKind,

    /// Minimum notice the current tenant gets before a viewing (default: 24)
    #[serde(default = "default_min_notice_hours")]
    pub min_notice_hours: u32,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8081
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_min_notice_hours() -> u32 {
    24
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            log_level: default_log_level(),
            slot_policy: SlotPolicyKind::default(),
            min_notice_hours: default_min_notice_hours(),
        }
    }
}

impl ServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Load and validate a JSON config file.
    pub fn load(path: &Path) -> ServerResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ServerError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: ServerConfig =
            serde_json::from_str(&content).map_err(|e| ServerError::ConfigParse {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ServerResult<()> {
        if self.host.trim().is_empty() {
            return Err(ServerError::InvalidConfig("host must not be empty".into()));
        }
        if self.port == 0 {
            return Err(ServerError::InvalidConfig("port must be non-zero".into()));
        }
        if self.min_notice_hours > MAX_MIN_NOTICE_HOURS {
            return Err(ServerError::InvalidConfig(format!(
                "min_notice_hours must be at most {}, got {}",
                MAX_MIN_NOTICE_HOURS, self.min_notice_hours
            )));
        }
        EnvFilter::try_new(&self.log_level).map_err(|e| {
            ServerError::InvalidConfig(format!("log_level {:?}: {}", self.log_level, e))
        })?;
        Ok(())
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn min_notice(&self) -> Duration {
        Duration::hours(i64::from(self.min_notice_hours))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8081);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.slot_policy, SlotPolicyKind::ViewingHours);
        assert_eq!(config.min_notice(), Duration::hours(24));
    }

    #[test]
    fn test_socket_addr() {
        let config = ServerConfig::with_port(8080);
        assert_eq!(config.socket_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let file = write_config(r#"{"port": 9000, "slot_policy": "upcoming_week"}"#);
        let config = ServerConfig::load(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.slot_policy, SlotPolicyKind::UpcomingWeek);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.min_notice_hours, 24);
    }

    #[test]
    fn test_load_missing_file() {
        let err = ServerConfig::load(Path::new("/nonexistent/viewdb.json")).unwrap_err();
        assert!(matches!(err, ServerError::ConfigRead { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let file = write_config("{port: }");
        let err = ServerConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ServerError::ConfigParse { .. }));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let file = write_config(r#"{"slot_policy": "weekends"}"#);
        assert!(ServerConfig::load(file.path()).is_err());
    }

    #[test]
    fn test_validate() {
        assert!(ServerConfig::with_port(0).validate().is_err());

        let mut config = ServerConfig::default();
        config.host = " ".to_string();
        assert!(config.validate().is_err());

        let mut config = ServerConfig::default();
        config.log_level = "viewdb=debug,tower_http=info".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_min_notice_bound() {
        let mut config = ServerConfig::default();
        config.min_notice_hours = MAX_MIN_NOTICE_HOURS;
        assert!(config.validate().is_ok());

        config.min_notice_hours = MAX_MIN_NOTICE_HOURS + 1;
        assert!(matches!(config.validate(), Err(ServerError::InvalidConfig(_))));

        config.min_notice_hours = u32::MAX;
        assert!(config.validate().is_err());

        let file = write_config(r#"{"min_notice_hours": 4294967295}"#);
        assert!(matches!(
            ServerConfig::load(file.path()),
            Err(ServerError::InvalidConfig(_))
        ));
    }
}
