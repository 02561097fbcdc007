#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;

use crate::game::{MAX_SHAPE_SIZE, MIN_SHAPE_SIZE, PIECE_KINDS};

/// Fill value of a single cell. `0` is empty, `1..=7` is a piece color index.
pub type Cell = u8;

pub const EMPTY: Cell = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    T,
    O,
    I,
    S,
    Z,
    L,
    J,
}

impl PieceKind {
    pub const ALL: [PieceKind; PIECE_KINDS] = [
        PieceKind::T,
        PieceKind::I,
        PieceKind::L,
        PieceKind::J,
        PieceKind::O,
        PieceKind::S,
        PieceKind::Z,
    ];

    #[must_use]
    pub fn random(rng: &mut fastrand::Rng) -> Self {
        Self::ALL[rng.usize(..Self::ALL.len())]
    }

    #[must_use]
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'T' => Some(PieceKind::T),
            'O' => Some(PieceKind::O),
            'I' => Some(PieceKind::I),
            'S' => Some(PieceKind::S),
            'Z' => Some(PieceKind::Z),
            'L' => Some(PieceKind::L),
            'J' => Some(PieceKind::J),
            _ => None,
        }
    }

    /// The fill value this piece writes into the board.
    #[must_use]
    pub fn color_index(self) -> Cell {
        match self {
            PieceKind::T => 1,
            PieceKind::O => 2,
            PieceKind::I => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::L => 6,
            PieceKind::J => 7,
        }
    }

    /// Returns a fresh copy of the canonical shape. Templates are never
    /// handed out by reference, so rotating the result cannot corrupt
    /// later spawns of the same kind.
    #[must_use]
    pub fn shape(self) -> Shape {
        let rows: &[&[Cell]] = match self {
            PieceKind::T => &[&[0, 0, 0], &[0, 1, 0], &[1, 1, 1]],
            PieceKind::O => &[&[2, 2], &[2, 2]],
            PieceKind::I => &[&[0, 3, 0], &[0, 3, 0], &[0, 3, 0]],
            PieceKind::S => &[&[0, 0, 0], &[0, 4, 4], &[4, 4, 0]],
            PieceKind::Z => &[&[0, 0, 0], &[5, 5, 0], &[0, 5, 5]],
            PieceKind::L => &[&[0, 6, 0], &[0, 6, 0], &[0, 6, 6]],
            PieceKind::J => &[&[0, 7, 0], &[0, 7, 0], &[7, 7, 0]],
        };

        let mut shape = Shape {
            size: rows.len(),
            cells: [[EMPTY; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
        };
        for (row, values) in rows.iter().enumerate() {
            shape.cells[row][..values.len()].copy_from_slice(values);
        }
        shape
    }
}

/// A square shape matrix stored inline, so every copy is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    size: usize,
    cells: [[Cell; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE],
}

impl Shape {
    /// Builds a shape from explicit rows. Returns `None` unless the rows form
    /// a square between 2x2 and 4x4.
    #[must_use]
    pub fn from_rows(rows: &[&[Cell]]) -> Option<Self> {
        let size = rows.len();
        if !(MIN_SHAPE_SIZE..=MAX_SHAPE_SIZE).contains(&size)
            || rows.iter().any(|row| row.len() != size)
        {
            return None;
        }

        let mut cells = [[EMPTY; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE];
        for (row, values) in rows.iter().enumerate() {
            cells[row][..size].copy_from_slice(values);
        }
        Some(Self { size, cells })
    }

    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        assert!(row < self.size && col < self.size, "shape index out of range");
        self.cells[row][col]
    }

    /// Iterates `(row, col, value)` over every occupied cell.
    pub fn occupied(&self) -> impl Iterator<Item = (usize, usize, Cell)> + '_ {
        (0..self.size).flat_map(move |row| {
            (0..self.size).filter_map(move |col| {
                let value = self.cells[row][col];
                (value != EMPTY).then_some((row, col, value))
            })
        })
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [[Cell; MAX_SHAPE_SIZE]; MAX_SHAPE_SIZE] {
        &mut self.cells
    }

    #[must_use]
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        self.cells[..self.size]
            .iter()
            .map(|row| row[..self.size].to_vec())
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// The falling, player-controlled piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivePiece {
    pub kind: PieceKind,
    pub shape: Shape,
    pub position: Position,
    pub color: Cell,
}

impl ActivePiece {
    #[must_use]
    pub fn new(kind: PieceKind, position: Position) -> Self {
        Self {
            kind,
            shape: kind.shape(),
            position,
            color: kind.color_index(),
        }
    }

    /// Board coordinates `(x, y, value)` of every occupied cell.
    pub fn cells(&self) -> impl Iterator<Item = (i32, i32, Cell)> + '_ {
        self.shape.occupied().map(move |(row, col, value)| {
            (
                self.position.x + col as i32,
                self.position.y + row as i32,
                value,
            )
        })
    }
}

/// The fixed grid of locked cells, addressed `[row][col]` with row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cols: usize,
    rows: usize,
    cells: Vec<Vec<Cell>>,
}

impl Board {
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self {
            cols,
            rows,
            cells: vec![vec![EMPTY; cols]; rows],
        }
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Panics when out of range; callers gate every access with a collision check.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row][col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Cell) {
        self.cells[row][col] = value;
    }

    /// Signed lookup used by the collision probes. `None` outside the grid.
    #[must_use]
    pub fn cell(&self, row: i32, col: i32) -> Option<Cell> {
        if row < 0 || col < 0 {
            return None;
        }
        self.cells
            .get(row as usize)
            .and_then(|cells| cells.get(col as usize))
            .copied()
    }

    pub fn grid(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    #[must_use]
    pub fn is_row_full(&self, row: usize) -> bool {
        self.cells[row].iter().all(|&cell| cell != EMPTY)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.iter().flatten().all(|&cell| cell == EMPTY)
    }

    /// Removes every full row, scanning bottom to top. After a removal the
    /// same index is examined again since the rows above have shifted down.
    /// Returns the number of rows removed.
    pub fn sweep(&mut self) -> usize {
        // A zero-width row is vacuously full and would never stop clearing
        if self.cols == 0 {
            return 0;
        }

        let mut cleared = 0;
        let mut row = self.rows;

        while row > 0 {
            if self.is_row_full(row - 1) {
                self.cells.remove(row - 1);
                self.cells.insert(0, vec![EMPTY; self.cols]);
                cleared += 1;
            } else {
                row -= 1;
            }
        }

        cleared
    }

    pub fn reset_all(&mut self) {
        for cell in self.cells.iter_mut().flatten() {
            *cell = EMPTY;
        }
    }
}

/// The four game controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Left,
    Right,
    Down,
    Rotate,
}

// Key presses buffered between frames, applied in arrival order
#[derive(Resource, Debug, Clone, Default)]
pub struct Input {
    pending: Vec<Control>,
}

impl Input {
    pub fn push(&mut self, control: Control) {
        self.pending.push(control);
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn take(&mut self) -> Vec<Control> {
        std::mem::take(&mut self.pending)
    }
}
