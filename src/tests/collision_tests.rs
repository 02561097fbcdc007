#[cfg(test)]
mod tests {
    use crate::collision::{collides_horizontally, collides_vertically, extends_below_floor, merge};
    use crate::components::{ActivePiece, Board, PieceKind, Position};
    use crate::tests::test_utils::{piece_at, shape};
    use proptest::prelude::*;

    #[test]
    fn test_horizontal_bounds() {
        let board = Board::new(10, 20);

        // The T's bottom row spans all three columns of its matrix
        assert!(!collides_horizontally(&board, &piece_at(PieceKind::T, 0, 0)));
        assert!(collides_horizontally(&board, &piece_at(PieceKind::T, -1, 0)));
        assert!(!collides_horizontally(&board, &piece_at(PieceKind::T, 7, 0)));
        assert!(collides_horizontally(&board, &piece_at(PieceKind::T, 8, 0)));
    }

    #[test]
    fn test_horizontal_ignores_empty_matrix_columns() {
        let board = Board::new(10, 20);

        // Only the middle column of the I matrix is occupied
        assert!(!collides_horizontally(&board, &piece_at(PieceKind::I, -1, 0)));
        assert!(!collides_horizontally(&board, &piece_at(PieceKind::I, 8, 0)));
        assert!(collides_horizontally(&board, &piece_at(PieceKind::I, -2, 0)));
    }

    #[test]
    fn test_horizontal_overlap_with_board() {
        let mut board = Board::new(10, 20);
        board.set(2, 3, 6);

        assert!(collides_horizontally(&board, &piece_at(PieceKind::T, 3, 0)));
        assert!(!collides_horizontally(&board, &piece_at(PieceKind::T, 4, 0)));
    }

    #[test]
    fn test_horizontal_probe_does_not_look_below_the_piece() {
        let mut board = Board::new(10, 20);
        board.set(3, 4, 1);

        // Cell directly under the T's bottom row is occupied; the X-axis probe
        // only checks the current row offset
        assert!(!collides_horizontally(&board, &piece_at(PieceKind::T, 4, 0)));
        assert!(collides_vertically(&board, &piece_at(PieceKind::T, 4, 0)));
    }

    #[test]
    fn test_horizontal_probe_ignores_vertical_bounds() {
        let board = Board::new(10, 20);
        let hanging = ActivePiece {
            shape: shape(&[&[0, 0, 1], &[0, 1, 1], &[0, 0, 1]]),
            ..piece_at(PieceKind::T, 4, 18)
        };

        // Bottom cell sits on row 20 of a 20-row board; the X-axis probe
        // still reports no collision
        assert!(!collides_horizontally(&board, &hanging));
        assert!(extends_below_floor(&board, &hanging));
    }

    #[test]
    fn test_vertical_floor() {
        let board = Board::new(10, 20);

        // T occupies matrix rows 1 and 2, so it rests at y = 17
        assert!(!collides_vertically(&board, &piece_at(PieceKind::T, 4, 16)));
        assert!(collides_vertically(&board, &piece_at(PieceKind::T, 4, 17)));

        // O is 2x2 and fully occupied, resting at y = 18
        assert!(!collides_vertically(&board, &piece_at(PieceKind::O, 4, 17)));
        assert!(collides_vertically(&board, &piece_at(PieceKind::O, 4, 18)));
    }

    #[test]
    fn test_vertical_lands_on_board_cell() {
        let mut board = Board::new(10, 20);
        board.set(10, 5, 2);

        // The T's stem is at matrix (1, 1); its bottom row at matrix row 2
        assert!(collides_vertically(&board, &piece_at(PieceKind::T, 4, 7)));
        assert!(!collides_vertically(&board, &piece_at(PieceKind::T, 4, 6)));
        assert!(!collides_vertically(&board, &piece_at(PieceKind::T, 6, 7)));
    }

    #[test]
    fn test_merge_copies_occupied_cells() {
        let mut board = Board::new(10, 20);
        let piece = piece_at(PieceKind::T, 4, 17);
        merge(&mut board, &piece);

        assert_eq!(board.get(19, 4), 1);
        assert_eq!(board.get(19, 5), 1);
        assert_eq!(board.get(19, 6), 1);
        assert_eq!(board.get(18, 5), 1);
        // Empty matrix cells never overwrite the board
        assert_eq!(board.get(18, 4), 0);
        assert_eq!(board.grid().flatten().filter(|&&c| c != 0).count(), 4);
    }

    #[test]
    fn test_merge_keeps_existing_cells_under_empty_matrix_cells() {
        let mut board = Board::new(10, 20);
        board.set(18, 4, 7);
        merge(&mut board, &piece_at(PieceKind::T, 4, 17));
        assert_eq!(board.get(18, 4), 7);
    }

    fn reference_vertical(board: &Board, piece: &ActivePiece) -> bool {
        let last_row = board.rows() as i32 - 1;
        piece.cells().any(|(x, y, _)| {
            y + 1 > last_row || board.get((y + 1) as usize, x as usize) != 0
        })
    }

    proptest! {
        #[test]
        fn vertical_probe_matches_definition(
            cols in 4usize..9,
            rows in 4usize..9,
            board_bits in prop::collection::vec(prop::bool::weighted(0.3), 64),
            size in 2usize..=4,
            shape_bits in prop::collection::vec(any::<bool>(), 16),
            x_seed in 0usize..64,
            y_seed in 0usize..64,
        ) {
            let mut board = Board::new(cols, rows);
            for row in 0..rows {
                for col in 0..cols {
                    if board_bits[row * cols + col] {
                        board.set(row, col, 2);
                    }
                }
            }

            let matrix: Vec<Vec<u8>> = (0..size)
                .map(|row| (0..size).map(|col| u8::from(shape_bits[row * 4 + col])).collect())
                .collect();
            let rows_ref: Vec<&[u8]> = matrix.iter().map(Vec::as_slice).collect();

            let piece = ActivePiece {
                kind: PieceKind::T,
                shape: shape(&rows_ref),
                position: Position {
                    x: (x_seed % (cols - size + 1)) as i32,
                    y: (y_seed % (rows - size + 1)) as i32,
                },
                color: 1,
            };

            prop_assert_eq!(
                collides_vertically(&board, &piece),
                reference_vertical(&board, &piece)
            );
        }
    }
}
