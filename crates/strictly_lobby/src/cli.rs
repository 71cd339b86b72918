//! Command-line interface for strictly_lobby.

use strictly_lobby::{ConfigError, LobbyConfig};
use clap::Parser;
use std::path::PathBuf;

/// Strictly Lobby - two-player tic-tac-toe matchmaking server
#[derive(Parser, Debug)]
#[command(name = "strictly_lobby")]
#[command(about = "Matchmaking server for line-protocol tic-tac-toe clients", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Port to listen on (overrides the config file)
    pub port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    pub host: Option<String>,

    /// Maximum number of concurrent sessions
    #[arg(long)]
    pub capacity: Option<usize>,

    /// Seconds between empty-session sweeps
    #[arg(long)]
    pub cleanup_interval: Option<u64>,

    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Resolves the effective configuration: flags over file over defaults.
    pub fn resolve(&self) -> Result<LobbyConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => LobbyConfig::from_file(path)?,
            None => LobbyConfig::default(),
        };
        if let Some(port) = self.port {
            config = config.with_port(port);
        }
        if let Some(host) = &self.host {
            config = config.with_host(host.clone());
        }
        if let Some(capacity) = self.capacity {
            config = config.with_capacity(capacity);
        }
        if let Some(secs) = self.cleanup_interval {
            config = config.with_cleanup_interval_secs(secs);
        }
        config.validate()?;
        Ok(config)
    }
}
