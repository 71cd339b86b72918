//! Server configuration.

use crate::registry::DEFAULT_CAPACITY;
use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the lobby server.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct LobbyConfig {
    /// Address to bind.
    host: String,

    /// TCP port to listen on.
    port: u16,

    /// Maximum number of concurrently live sessions.
    capacity: usize,

    /// Seconds between empty-session sweeps.
    cleanup_interval_secs: u64,
}

impl Default for LobbyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8888,
            capacity: DEFAULT_CAPACITY,
            cleanup_interval_secs: 30,
        }
    }
}

impl LobbyConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(port = config.port, capacity = config.capacity, "Config loaded successfully");
        Ok(config)
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::new("capacity must be at least 1".to_string()));
        }
        if self.cleanup_interval_secs == 0 {
            return Err(ConfigError::new(
                "cleanup_interval_secs must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Sweep period as a [`Duration`].
    pub fn cleanup_interval(&self) -> Duration {
        Duration::from_secs(self.cleanup_interval_secs)
    }

    /// `host:port` for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "port = 9000\ncapacity = 4").expect("write");

        let config = LobbyConfig::from_file(file.path()).expect("valid config");
        assert_eq!(*config.port(), 9000);
        assert_eq!(*config.capacity(), 4);
        assert_eq!(config.host(), "0.0.0.0");
        assert_eq!(config.cleanup_interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "capacity = 0").expect("write");

        let err = LobbyConfig::from_file(file.path()).unwrap_err();
        assert!(err.message.contains("capacity"));
    }

    #[test]
    fn test_missing_file_reports_read_failure() {
        let err = LobbyConfig::from_file("/nonexistent/lobby.toml").unwrap_err();
        assert!(err.message.starts_with("Failed to read config file"));
    }

    #[test]
    fn test_setters_override() {
        let config = LobbyConfig::default().with_port(7000).with_host("127.0.0.1".to_string());
        assert_eq!(config.bind_addr(), "127.0.0.1:7000");
    }
}
