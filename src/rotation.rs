#![warn(clippy::all, clippy::pedantic)]

use log::debug;

use crate::collision::{collides_horizontally, extends_below_floor};
use crate::components::{ActivePiece, Board, Shape};
use crate::game::WALL_KICKS;

/// Rotates the matrix 90 degrees clockwise in place: transpose, then reverse
/// each row. Only valid for square matrices, which every `Shape` is.
pub fn rotate_clockwise(shape: &mut Shape) {
    let size = shape.size();
    let cells = shape.cells_mut();

    for row in 0..size {
        for col in 0..row {
            let tmp = cells[row][col];
            cells[row][col] = cells[col][row];
            cells[col][row] = tmp;
        }
    }

    for row in cells.iter_mut().take(size) {
        row[..size].reverse();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationOutcome {
    /// Rotated in place without any correction.
    Rotated,
    /// Rotated and shifted horizontally by the given offset.
    Kicked(i32),
    /// No kick resolved the overlap; the piece was left unchanged.
    Rejected,
}

/// Rotates the active piece, correcting a horizontal overlap with the fixed
/// kick table (one cell right, then one cell left of the original column).
///
/// When no kick clears the overlap, or the rotated shape would hang below the
/// floor, the rotation is undone.
pub fn rotate_piece(board: &Board, piece: &mut ActivePiece) -> RotationOutcome {
    let original = *piece;
    rotate_clockwise(&mut piece.shape);

    let outcome = if collides_horizontally(board, piece) {
        let kick = WALL_KICKS.iter().copied().find(|&dx| {
            piece.position.x = original.position.x + dx;
            !collides_horizontally(board, piece)
        });

        match kick {
            Some(dx) => {
                debug!("Wall kick by {dx} after rotating {:?}", piece.kind);
                RotationOutcome::Kicked(dx)
            }
            None => RotationOutcome::Rejected,
        }
    } else {
        RotationOutcome::Rotated
    };

    if outcome == RotationOutcome::Rejected || extends_below_floor(board, piece) {
        debug!("Rotation of {:?} rejected", piece.kind);
        *piece = original;
        return RotationOutcome::Rejected;
    }

    outcome
}
