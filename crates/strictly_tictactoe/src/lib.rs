//! Pure tic-tac-toe rules.
//!
//! - [`Board`], [`Square`], [`Mark`] and [`Position`] model the grid.
//! - [`rules`] detects wins (weighted line sums) and draws.
//! - [`Game`] validates and applies moves, tracking turn and outcome.
//!
//! ```
//! use strictly_tictactoe::{Game, GameStatus, Mark};
//!
//! let mut game = Game::new();
//! assert_eq!(game.place_at(Mark::X, 1, 1), Ok(GameStatus::InProgress));
//! assert_eq!(game.to_move(), Mark::O);
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
mod game;
mod position;
pub mod rules;
mod types;

pub use error::MoveError;
pub use game::Game;
pub use position::Position;
pub use rules::{check_winner, evaluate, is_draw, is_full};
pub use types::{Board, GameStatus, Mark, Square};
