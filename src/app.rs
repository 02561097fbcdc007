#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow potential wrapping when casting between types as board coordinates are within reasonable ranges
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use crossterm::event::KeyCode;
use log::debug;

use crate::Time;
use crate::components::{Cell, Control, Input, Position};
use crate::config::Config;
use crate::sound::AudioState;
use crate::systems::{GameState, Scoreboard, game_tick_system, input_system, score_system};

pub type AppResult<T> = anyhow::Result<T>;

pub struct App {
    pub world: World,
    pub should_quit: bool,
    pub show_grid: bool,
}

impl App {
    pub fn new(config: &Config, audio: AudioState) -> Self {
        Self::with_state(
            config,
            GameState::new(config.board.cols, config.board.rows),
            audio,
        )
    }

    pub fn with_state(config: &Config, state: GameState, audio: AudioState) -> Self {
        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(Input::default());
        world.insert_resource(Scoreboard::default());
        world.insert_resource(state);
        world.insert_resource(audio);

        Self {
            world,
            should_quit: false,
            show_grid: config.display.show_grid,
        }
    }

    /// Maps a key to a game control, or marks the app for exit.
    pub fn handle_key(&mut self, code: KeyCode) {
        let control = match code {
            KeyCode::Left => Control::Left,
            KeyCode::Right => Control::Right,
            KeyCode::Down => Control::Down,
            KeyCode::Up | KeyCode::Enter => Control::Rotate,
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                return;
            }
            _ => return,
        };

        debug!("Key {code:?} mapped to {control:?}");
        self.world.resource_mut::<Input>().push(control);
    }

    /// One frame of game logic: buffered input first, then gravity, then
    /// the score display.
    pub fn frame(&mut self, delta_ms: f64) {
        input_system(&mut self.world);
        game_tick_system(&mut self.world, delta_ms);
        score_system(&mut self.world);
    }

    /// Measures the wall-clock delta since the previous frame and runs it.
    pub fn on_tick(&mut self) {
        let delta_ms = {
            let mut time = self.world.resource_mut::<Time>();
            time.update();
            time.delta_millis()
        };
        self.frame(delta_ms);
    }

    /// Every occupied cell to draw: the locked board at offset (0, 0), then
    /// the active piece at its position.
    pub fn get_render_cells(&self) -> Vec<(Position, Cell)> {
        let state = self.world.resource::<GameState>();

        let mut cells: Vec<(Position, Cell)> = state
            .board
            .grid()
            .enumerate()
            .flat_map(|(y, row)| {
                row.iter()
                    .enumerate()
                    .filter(|(_, value)| **value != 0)
                    .map(move |(x, value)| {
                        (
                            Position {
                                x: x as i32,
                                y: y as i32,
                            },
                            *value,
                        )
                    })
            })
            .collect();

        cells.extend(
            state
                .piece
                .cells()
                .map(|(x, y, value)| (Position { x, y }, value)),
        );
        cells
    }
}
