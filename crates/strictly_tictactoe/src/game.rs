//! Move-validating game engine for tic-tac-toe.

use crate::error::MoveError;
use crate::position::Position;
use crate::rules;
use crate::types::{Board, GameStatus, Mark, Square};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Tic-tac-toe game engine.
///
/// Owns the board, the turn and the outcome. Every rejected move leaves all
/// three untouched; once the status is terminal the board only changes
/// through [`Game::reset`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
    board: Board,
    to_move: Mark,
    status: GameStatus,
}

impl Game {
    /// Creates a new game with X to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            to_move: Mark::X,
            status: GameStatus::InProgress,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns the mark that owns the next move.
    pub fn to_move(&self) -> Mark {
        self.to_move
    }

    /// Returns the game status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// True once a win or draw was detected.
    pub fn is_over(&self) -> bool {
        self.status.is_terminal()
    }

    /// Places `mark` at zero-based `(row, col)`.
    ///
    /// Checks run in order: game over, turn ownership, then cell bounds and
    /// occupancy.
    ///
    /// # Errors
    ///
    /// Returns the first failed precondition as a [`MoveError`].
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn place_at(&mut self, mark: Mark, row: usize, col: usize) -> Result<GameStatus, MoveError> {
        self.check_turn(mark)?;
        let pos = Position::from_coords(row, col)?;
        self.place(mark, pos)
    }

    /// Places `mark` at an already-validated position.
    ///
    /// # Errors
    ///
    /// Returns [`MoveError`] if the game is over, it is not `mark`'s turn, or
    /// the cell is occupied.
    #[instrument(skip(self), fields(to_move = %self.to_move))]
    pub fn place(&mut self, mark: Mark, pos: Position) -> Result<GameStatus, MoveError> {
        self.check_turn(mark)?;
        if !self.board.is_empty(pos) {
            return Err(MoveError::CellOccupied(pos));
        }

        self.board.set(pos, Square::Occupied(mark));
        self.to_move = mark.opponent();
        self.status = rules::evaluate(&self.board);

        debug!(position = %pos, status = ?self.status, moves = self.board.occupied(), "Move applied");
        Ok(self.status)
    }

    /// Restores the initial state: empty board, X to move, in progress.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn check_turn(&self, mark: Mark) -> Result<(), MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if mark != self.to_move {
            return Err(MoveError::NotYourTurn {
                expected: self.to_move,
            });
        }
        Ok(())
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}
