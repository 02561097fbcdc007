pub mod loader;

use serde::{Deserialize, Serialize};

use crate::game::{BOARD_COLS, BOARD_ROWS, FRAME_RATE_MS};
pub use loader::ConfigError;

// Smallest and largest arena accepted from a config file
const MIN_BOARD_SIDE: usize = 4;
const MAX_BOARD_SIDE: usize = 64;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub board: BoardConfig,
    pub audio: AudioConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub cols: usize,
    pub rows: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            cols: BOARD_COLS,
            rows: BOARD_ROWS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    pub music_enabled: bool,
    pub volume: f32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            music_enabled: true,
            volume: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub frame_rate_ms: u64,
    pub show_grid: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            frame_rate_ms: FRAME_RATE_MS,
            show_grid: false,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let side = MIN_BOARD_SIDE..=MAX_BOARD_SIDE;
        if !side.contains(&self.board.cols) || !side.contains(&self.board.rows) {
            return Err(ConfigError::Invalid(format!(
                "board must be between {MIN_BOARD_SIDE}x{MIN_BOARD_SIDE} and {MAX_BOARD_SIDE}x{MAX_BOARD_SIDE}, got {}x{}",
                self.board.cols, self.board.rows
            )));
        }

        if !(0.0..=1.0).contains(&self.audio.volume) {
            return Err(ConfigError::Invalid(format!(
                "volume must be between 0.0 and 1.0, got {}",
                self.audio.volume
            )));
        }

        if self.display.frame_rate_ms == 0 {
            return Err(ConfigError::Invalid(
                "frame_rate_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
