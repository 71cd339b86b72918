//! Strictly Lobby - matchmaking and authoritative game state for two-player
//! tic-tac-toe.
//!
//! # Architecture
//!
//! - **Session**: one board, turn order and two seats behind a single lock
//! - **SessionRegistry**: matchmaking, capacity limit, empty-session cleanup
//! - **Transport**: line-based TCP clients acting as [`Participant`]s
//! - **Janitor**: periodic cleanup driver
//!
//! # Example
//!
//! ```no_run
//! use strictly_lobby::{LobbyConfig, SessionRegistry, serve, spawn_janitor};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = LobbyConfig::default();
//! let registry = SessionRegistry::new(*config.capacity());
//! let _janitor = spawn_janitor(registry.clone(), config.cleanup_interval());
//! let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
//! serve(listener, registry).await
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod janitor;
mod participant;
mod registry;
mod session;
mod transport;

// Crate-level exports - Configuration
pub use config::{ConfigError, LobbyConfig};

// Crate-level exports - Errors
pub use error::LobbyError;

// Crate-level exports - Participants
pub use participant::{Notification, Participant, ParticipantId};

// Crate-level exports - Session management
pub use registry::{DEFAULT_CAPACITY, SessionRegistry, SessionSummary};
pub use session::{Session, SessionId, SessionPhase, SessionSnapshot};

// Crate-level exports - Transport
pub use janitor::spawn_janitor;
pub use transport::{ClientCommand, CommandError, Connection, handle_connection, serve};

// Crate-level exports - Game types (tic-tac-toe)
pub use strictly_tictactoe::{Board, GameStatus, Mark, MoveError, Position, Square};
