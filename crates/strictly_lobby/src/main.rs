//! Strictly Lobby - server entry point.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use strictly_lobby::{SessionRegistry, serve, spawn_janitor};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let config = cli.resolve()?;
    info!(port = config.port(), host = %config.host(), "Starting TicTacToe server");
    info!(capacity = config.capacity(), "Session capacity");

    let registry = SessionRegistry::new(*config.capacity());
    let janitor = spawn_janitor(registry.clone(), config.cleanup_interval());

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    info!("Server ready, accepting connections");
    info!("Press Ctrl+C to stop the server");

    tokio::select! {
        result = serve(listener, registry.clone()) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    janitor.abort();
    registry.log_status();
    Ok(())
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,strictly_lobby=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
