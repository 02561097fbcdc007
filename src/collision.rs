#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow sign loss when going from signed to unsigned types since merge runs only on validated positions
    clippy::cast_sign_loss,
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use crate::components::{ActivePiece, Board, EMPTY};

/// X-axis probe at the piece's current row offset: true when an occupied cell
/// sits outside the board columns or on an occupied board cell.
///
/// Vertical displacement is not considered. A cell whose row lies outside the
/// board is skipped rather than reported, so this is only meaningful when the
/// vertical position is already legal.
#[must_use]
pub fn collides_horizontally(board: &Board, piece: &ActivePiece) -> bool {
    let last_col = board.cols() as i32 - 1;

    piece.cells().any(|(x, y, _)| {
        if x < 0 || x > last_col {
            return true;
        }
        board.cell(y, x).is_some_and(|cell| cell != EMPTY)
    })
}

/// Probe one row below the current position: true when an occupied cell would
/// pass the last board row or land on an occupied board cell.
#[must_use]
pub fn collides_vertically(board: &Board, piece: &ActivePiece) -> bool {
    let last_row = board.rows() as i32 - 1;

    piece.cells().any(|(x, y, _)| {
        if y + 1 > last_row {
            return true;
        }
        board.cell(y + 1, x).is_some_and(|cell| cell != EMPTY)
    })
}

/// True when some occupied cell lies below the last board row.
#[must_use]
pub fn extends_below_floor(board: &Board, piece: &ActivePiece) -> bool {
    let last_row = board.rows() as i32 - 1;
    piece.cells().any(|(_, y, _)| y > last_row)
}

/// Copies every occupied shape cell into the board. Only called right after a
/// vertical collision, when the piece is resting at a legal position.
pub fn merge(board: &mut Board, piece: &ActivePiece) {
    for (x, y, value) in piece.cells() {
        debug_assert!(x >= 0 && y >= 0, "merging a piece outside the board");
        board.set(y as usize, x as usize, value);
    }
}
