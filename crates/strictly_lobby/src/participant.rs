//! Participants as seen by the game core, and what the core tells them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use strictly_tictactoe::{Board, Mark, Square};

static NEXT_PARTICIPANT: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a connected participant.
///
/// Two handles to the same connection carry the same id; unrelated
/// connections never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("participant#{}", _0)]
pub struct ParticipantId(u64);

impl ParticipantId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        Self(NEXT_PARTICIPANT.fetch_add(1, Ordering::Relaxed))
    }
}

/// A connected player, owned by the transport.
///
/// Sessions only hold a `Weak` to a participant, so a participant whose
/// connection has been dropped is simply unreachable.
pub trait Participant: fmt::Debug + Send + Sync {
    /// Identity used for seat lookups.
    fn id(&self) -> ParticipantId;

    /// Best-effort, non-blocking delivery of one notification.
    fn notify(&self, notification: Notification);

    /// Whether the connection is still up.
    fn is_reachable(&self) -> bool;

    /// Records the mark this participant was seated with.
    fn assign_mark(&self, mark: Mark);
}

/// Messages pushed from a session to its participants.
///
/// `Display` renders the line protocol; [`Notification::BoardState`]
/// spans two lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    /// The recipient was seated with this mark.
    MarkAssigned(Mark),
    /// The other seat was vacated.
    OpponentDisconnected,
    /// Full board in row-major order and the mark to move next.
    BoardState {
        /// Row-major squares.
        squares: [Square; 9],
        /// Mark that owns the next move.
        to_move: Mark,
    },
    /// The game ended with this winner, or `None` for a draw.
    Winner(Option<Mark>),
    /// A request from the recipient was rejected.
    Error(String),
}

impl Notification {
    /// Builds a board-state notification from a board.
    pub fn board_state(board: &Board, to_move: Mark) -> Self {
        Self::BoardState {
            squares: *board.squares(),
            to_move,
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notification::MarkAssigned(mark) => write!(f, "SYMBOL:{}", mark),
            Notification::OpponentDisconnected => write!(f, "ERROR:Opponent disconnected"),
            Notification::BoardState { squares, to_move } => {
                let cells = squares
                    .iter()
                    .map(|s| s.weight().to_string())
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "BOARD:{}\nTURN:{}", cells, to_move)
            }
            Notification::Winner(Some(mark)) => write!(f, "WINNER:{}", mark),
            Notification::Winner(None) => write!(f, "WINNER:DRAW"),
            Notification::Error(message) => write!(f, "ERROR:{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strictly_tictactoe::Position;

    #[test]
    fn test_ids_are_unique() {
        let a = ParticipantId::next();
        let b = ParticipantId::next();
        assert_ne!(a, b);
        assert_eq!(a, a);
    }

    #[test]
    fn test_board_state_wire_format() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Mark::X));
        board.set(Position::Center, Square::Occupied(Mark::O));
        let line = Notification::board_state(&board, Mark::X).to_string();
        assert_eq!(line, "BOARD:10,0,0,0,100,0,0,0,0\nTURN:X");
    }

    #[test]
    fn test_outcome_wire_format() {
        assert_eq!(
            Notification::Winner(Some(Mark::O)).to_string(),
            "WINNER:O"
        );
        assert_eq!(Notification::Winner(None).to_string(), "WINNER:DRAW");
        assert_eq!(Notification::MarkAssigned(Mark::X).to_string(), "SYMBOL:X");
    }
}
