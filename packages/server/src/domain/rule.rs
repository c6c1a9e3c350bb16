//! Win detection.

use super::entity::{Board, GameResult};

/// The eight winning lines: rows, columns, then diagonals.
///
/// When several lines complete at once, the first one in this order is reported.
pub const WIN_LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// Evaluate a board.
///
/// Returns `Won` for the first uniform non-empty line, `Draw` when no line
/// matches and the board is full, and `InProgress` otherwise.
pub fn check_winner(board: &Board) -> GameResult {
    let cells = board.cells();
    for line in WIN_LINES {
        let [a, b, c] = line;
        if let Some(mark) = cells[a]
            && cells[b] == Some(mark)
            && cells[c] == Some(mark)
        {
            return GameResult::Won { mark, line };
        }
    }
    if board.is_full() {
        GameResult::Draw
    } else {
        GameResult::InProgress
    }
}
