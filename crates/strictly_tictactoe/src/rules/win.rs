//! Win detection logic for tic-tac-toe.

use crate::{Board, Mark, Position};
use tracing::instrument;

/// The eight winning lines: 3 rows, 3 columns, 2 diagonals.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [Position::MiddleLeft, Position::Center, Position::MiddleRight],
    [Position::BottomLeft, Position::BottomCenter, Position::BottomRight],
    // Columns
    [Position::TopLeft, Position::MiddleLeft, Position::BottomLeft],
    [Position::TopCenter, Position::Center, Position::BottomCenter],
    [Position::TopRight, Position::MiddleRight, Position::BottomRight],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Checks if there is a winner on the board.
///
/// Each line is summed by square weight; a sum of three times a mark's
/// weight means that mark filled the line.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    LINES.iter().find_map(|line| {
        let sum: u32 = line.iter().map(|&pos| board.get(pos).weight()).sum();
        [Mark::X, Mark::O]
            .into_iter()
            .find(|mark| sum == mark.weight() * 3)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Square;

    /// Reference check by explicit three-way equality.
    fn winner_by_equality(board: &Board) -> Option<Mark> {
        for [a, b, c] in LINES {
            let sq = board.get(a);
            if let Square::Occupied(mark) = sq
                && sq == board.get(b)
                && sq == board.get(c)
            {
                return Some(mark);
            }
        }
        None
    }

    fn board_from_code(mut code: usize) -> Board {
        let mut board = Board::new();
        for pos in Position::ALL {
            let square = match code % 3 {
                0 => Square::Empty,
                1 => Square::Occupied(Mark::X),
                _ => Square::Occupied(Mark::O),
            };
            board.set(pos, square);
            code /= 3;
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::new()), None);
    }

    #[test]
    fn test_every_line_detected() {
        for mark in [Mark::X, Mark::O] {
            for line in LINES {
                let mut board = Board::new();
                for pos in line {
                    board.set(pos, Square::Occupied(mark));
                }
                assert_eq!(check_winner(&board), Some(mark), "line {:?}", line);
            }
        }
    }

    #[test]
    fn test_mixed_line_is_not_a_win() {
        let mut board = Board::new();
        board.set(Position::TopLeft, Square::Occupied(Mark::X));
        board.set(Position::TopCenter, Square::Occupied(Mark::X));
        board.set(Position::TopRight, Square::Occupied(Mark::O));
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_weighted_sum_matches_equality_on_every_board() {
        // 3^9 boards, reachable or not.
        for code in 0..19_683 {
            let board = board_from_code(code);
            let expected = winner_by_equality(&board);
            let actual = check_winner(&board);
            // Boards with two winners are unreachable; both methods then
            // report the first winning line in LINES order.
            assert_eq!(actual, expected, "board {}", code);
        }
    }
}
