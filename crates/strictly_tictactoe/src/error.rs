//! Move validation errors.

use crate::position::Position;
use crate::types::Mark;

/// Error that can occur when validating or applying a move.
///
/// Every variant is a rejected precondition; the game is left unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display)]
pub enum MoveError {
    /// The game already ended in a win or a draw.
    #[display("Game is over")]
    GameOver,

    /// The mark does not own the current turn.
    #[display("Not your turn, waiting for {}", expected)]
    NotYourTurn {
        /// Mark that owns the turn.
        expected: Mark,
    },

    /// Coordinates fall outside the 3x3 grid.
    #[display("Invalid cell ({}, {}): out of range", row, col)]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },

    /// The target cell already holds a mark.
    #[display("Invalid cell {}: already occupied", _0)]
    CellOccupied(Position),
}

impl MoveError {
    /// True for the out-of-range and occupied-cell rejections.
    pub fn is_invalid_cell(&self) -> bool {
        matches!(self, MoveError::OutOfBounds { .. } | MoveError::CellOccupied(_))
    }
}

impl std::error::Error for MoveError {}
