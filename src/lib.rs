pub mod app;
pub mod collision;
pub mod components;
pub mod config;
pub mod game;
pub mod progression;
pub mod rotation;
pub mod sound;
pub mod systems;
pub mod ui;

#[cfg(test)]
mod tests;

use bevy_ecs::prelude::Resource;
use std::time::{Duration, Instant};

/// Wall-clock frame timer. Each `update` produces the delta since the
/// previous frame, which the host feeds into `GameState::tick`.
#[derive(Resource, Debug, Clone)]
pub struct Time {
    delta: Duration,
    last_update: Instant,
}

impl Time {
    pub fn new() -> Self {
        Self {
            delta: Duration::default(),
            last_update: Instant::now(),
        }
    }

    pub fn update(&mut self) {
        let now = Instant::now();
        self.delta = now.duration_since(self.last_update);
        self.last_update = now;
    }

    pub fn delta(&self) -> Duration {
        self.delta
    }

    pub fn delta_millis(&self) -> f64 {
        self.delta.as_secs_f64() * 1000.0
    }
}

impl Default for Time {
    fn default() -> Self {
        Self::new()
    }
}
