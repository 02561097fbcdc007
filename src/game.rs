#![warn(clippy::all, clippy::pedantic)]

// Arena dimensions (a 500x600 canvas at a scale of 25 per cell)
pub const BOARD_COLS: usize = 20;
pub const BOARD_ROWS: usize = 24;

// Shapes are square matrices between 2x2 and 4x4
pub const MIN_SHAPE_SIZE: usize = 2;
pub const MAX_SHAPE_SIZE: usize = 4;

// Smallest board side every catalog piece can spawn and lock on
pub const MIN_PLAYABLE_SIDE: usize = 3;

// Number of piece kinds, and therefore the highest fill value a cell can hold
pub const PIECE_KINDS: usize = 7;

// Gravity timing in milliseconds
pub const INITIAL_DROP_INTERVAL: u32 = 500;
pub const MIN_DROP_INTERVAL: u32 = 100;
pub const DROP_INTERVAL_STEP: u32 = 100;

// Every ROWS_PER_STAGE cleared rows the game speeds up and rows pay more
pub const ROWS_PER_STAGE: u32 = 5;
pub const POINTS_PER_ROW: u32 = 10;

// Wall-kick offsets tried, in order, after a rotation overlaps something
pub const WALL_KICKS: [i32; 2] = [1, -1];

// Host frame pacing
pub const FRAME_RATE_MS: u64 = 16;
