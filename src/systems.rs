#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use log::{debug, info, trace};

use crate::collision::{collides_horizontally, collides_vertically, merge};
use crate::components::{ActivePiece, Board, Control, Input, PieceKind, Position};
use crate::game::MIN_PLAYABLE_SIDE;
use crate::progression::Progression;
use crate::rotation::{RotationOutcome, rotate_piece};

/// Notifications for the host collaborators, drained once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    PieceLocked,
    RowsCleared(usize),
    ScoreChanged(u32),
    GameOver { final_score: u32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GravityStep {
    Moved,
    Locked { rows_cleared: usize, game_over: bool },
}

/// The whole mutable session: board, falling piece and progression.
#[derive(Resource, Debug, Clone)]
pub struct GameState {
    pub board: Board,
    pub piece: ActivePiece,
    pub progression: Progression,
    rng: fastrand::Rng,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Both sides must be at least `MIN_PLAYABLE_SIDE`, otherwise a spawned
    /// piece can hang off the board and the next lock panics.
    #[must_use]
    pub fn new(cols: usize, rows: usize) -> Self {
        Self::from_rng(cols, rows, fastrand::Rng::new())
    }

    #[must_use]
    pub fn with_seed(cols: usize, rows: usize, seed: u64) -> Self {
        Self::from_rng(cols, rows, fastrand::Rng::with_seed(seed))
    }

    fn from_rng(cols: usize, rows: usize, rng: fastrand::Rng) -> Self {
        debug_assert!(
            cols >= MIN_PLAYABLE_SIDE && rows >= MIN_PLAYABLE_SIDE,
            "board {cols}x{rows} is smaller than the largest piece"
        );
        let mut state = Self {
            board: Board::new(cols, rows),
            piece: ActivePiece::new(PieceKind::T, Self::spawn_position(cols)),
            progression: Progression::default(),
            rng,
            events: Vec::new(),
        };
        state.spawn_piece();
        state
    }

    /// Horizontally centered, top row.
    #[must_use]
    pub fn spawn_position(cols: usize) -> Position {
        Position {
            x: (cols / 2) as i32 - 1,
            y: 0,
        }
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.progression.score
    }

    /// Spawns a uniformly random piece. Returns true when the spawn was
    /// blocked and the session was reset.
    pub fn spawn_piece(&mut self) -> bool {
        let kind = PieceKind::random(&mut self.rng);
        self.spawn_kind(kind)
    }

    /// Spawns the given kind at the spawn position. If it already collides
    /// one row down the game is over: score, progression and board reset and
    /// the same piece stays in play on the empty board.
    pub fn spawn_kind(&mut self, kind: PieceKind) -> bool {
        self.piece = ActivePiece::new(kind, Self::spawn_position(self.board.cols()));
        debug!("Spawned {kind:?} at {:?}", self.piece.position);

        if !collides_vertically(&self.board, &self.piece) {
            return false;
        }

        let final_score = self.progression.score;
        info!(
            "Spawn blocked, game over with score {final_score} after {} rows",
            self.progression.rows_cleared
        );
        self.progression.reset();
        self.board.reset_all();
        self.events.push(GameEvent::GameOver { final_score });
        true
    }

    /// One gravity step: move down if possible, otherwise lock, sweep and
    /// spawn the next piece.
    pub fn advance_gravity(&mut self) -> GravityStep {
        if !collides_vertically(&self.board, &self.piece) {
            self.piece.position.y += 1;
            return GravityStep::Moved;
        }

        merge(&mut self.board, &self.piece);
        self.events.push(GameEvent::PieceLocked);

        let rows_cleared = self.board.sweep();
        if rows_cleared > 0 {
            let points = self.progression.record_rows(rows_cleared);
            info!(
                "Cleared {rows_cleared} rows for {points} points (total rows {}, interval {}ms)",
                self.progression.rows_cleared, self.progression.drop_interval
            );
            self.events.push(GameEvent::RowsCleared(rows_cleared));
        }

        let game_over = self.spawn_piece();
        self.events.push(GameEvent::ScoreChanged(self.progression.score));

        GravityStep::Locked {
            rows_cleared,
            game_over,
        }
    }

    /// Feeds one frame's elapsed time. Returns the gravity step when the
    /// accumulated time passed the drop interval.
    pub fn tick(&mut self, delta_ms: f64) -> Option<GravityStep> {
        if self.progression.accumulate(delta_ms) {
            trace!("Gravity due at interval {}ms", self.progression.drop_interval);
            Some(self.advance_gravity())
        } else {
            None
        }
    }

    /// Shifts the piece by `dx` columns. The shift is undone when it collides
    /// or when the piece sits at the lowest row its matrix height allows.
    pub fn shift(&mut self, dx: i32) -> bool {
        self.piece.position.x += dx;

        let resting_row = self.board.rows() as i32 - self.piece.shape.size() as i32;
        if collides_horizontally(&self.board, &self.piece) || self.piece.position.y == resting_row
        {
            self.piece.position.x -= dx;
            return false;
        }
        true
    }

    pub fn rotate(&mut self) -> RotationOutcome {
        rotate_piece(&self.board, &mut self.piece)
    }

    pub fn apply(&mut self, control: Control) {
        match control {
            Control::Left => {
                self.shift(-1);
            }
            Control::Right => {
                self.shift(1);
            }
            Control::Down => {
                self.advance_gravity();
            }
            Control::Rotate => {
                self.rotate();
            }
        }
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

/// What the score display collaborator shows. Updated only from events.
/// `pieces` and `rows` count the current session and restart at game over.
#[derive(Resource, Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u32,
    pub best: u32,
    pub pieces: u32,
    pub rows: u32,
    pub games_over: u32,
}

pub fn input_system(world: &mut World) {
    let controls = world.resource_mut::<Input>().take();
    if controls.is_empty() {
        return;
    }

    let mut state = world.resource_mut::<GameState>();
    for control in controls {
        debug!("Applying {control:?}");
        state.apply(control);
    }
}

pub fn game_tick_system(world: &mut World, delta_ms: f64) {
    trace!("Game tick with delta: {delta_ms}");
    let mut state = world.resource_mut::<GameState>();
    if let Some(step) = state.tick(delta_ms) {
        trace!("Gravity step: {step:?}");
    }
}

pub fn score_system(world: &mut World) {
    let events = world.resource_mut::<GameState>().drain_events();

    let mut scoreboard = world.resource_mut::<Scoreboard>();
    for event in events {
        match event {
            GameEvent::ScoreChanged(score) => {
                scoreboard.score = score;
                scoreboard.best = scoreboard.best.max(score);
            }
            GameEvent::PieceLocked => scoreboard.pieces += 1,
            GameEvent::RowsCleared(rows) => scoreboard.rows += rows as u32,
            GameEvent::GameOver { final_score } => {
                info!(
                    "Game {} over: {final_score} points, {} pieces, {} rows",
                    scoreboard.games_over + 1,
                    scoreboard.pieces,
                    scoreboard.rows
                );
                scoreboard.best = scoreboard.best.max(final_score);
                scoreboard.games_over += 1;
                scoreboard.score = 0;
                scoreboard.pieces = 0;
                scoreboard.rows = 0;
            }
        }
    }
}
