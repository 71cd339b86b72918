//! Errors reported by sessions and the session registry.

use strictly_tictactoe::MoveError;

/// A rejected lobby operation.
///
/// None of these are fatal: the session or registry state is unchanged and
/// the caller decides whether to retry.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::From)]
pub enum LobbyError {
    /// Both seats of the session are taken.
    #[display("Session is full")]
    SessionFull,

    /// The registry holds its maximum number of sessions and none is open.
    #[display("Server is at capacity ({} sessions)", capacity)]
    CapacityExceeded {
        /// Configured session limit.
        capacity: usize,
    },

    /// A move was attempted before an opponent was seated.
    #[display("Waiting for opponent")]
    WaitingForOpponent,

    /// The game rules rejected the move.
    #[display("{}", _0)]
    #[from]
    Move(MoveError),
}

impl std::error::Error for LobbyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LobbyError::Move(err) => Some(err),
            _ => None,
        }
    }
}
