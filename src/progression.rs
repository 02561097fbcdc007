#![warn(clippy::all, clippy::pedantic)]

use crate::game::{
    DROP_INTERVAL_STEP, INITIAL_DROP_INTERVAL, MIN_DROP_INTERVAL, POINTS_PER_ROW, ROWS_PER_STAGE,
};

/// Score, cleared-row counter and gravity timing for one session.
#[derive(Debug, Clone, PartialEq)]
pub struct Progression {
    pub score: u32,
    pub rows_cleared: u32,
    pub drop_interval: u32,
    pub elapsed: f64,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            score: 0,
            rows_cleared: 0,
            drop_interval: INITIAL_DROP_INTERVAL,
            elapsed: 0.0,
        }
    }
}

impl Progression {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Points awarded for one row at the given cumulative count.
    #[must_use]
    pub fn points_for_row(rows_cleared: u32) -> u32 {
        POINTS_PER_ROW * (rows_cleared / ROWS_PER_STAGE + 1)
    }

    /// Drop interval at the given cumulative count, never below the floor.
    #[must_use]
    pub fn interval_for(rows_cleared: u32) -> u32 {
        let reduction = DROP_INTERVAL_STEP.saturating_mul(rows_cleared / ROWS_PER_STAGE);
        INITIAL_DROP_INTERVAL
            .saturating_sub(reduction)
            .max(MIN_DROP_INTERVAL)
    }

    /// Accounts for a single cleared row. The counter is bumped first and the
    /// award uses the updated total. Once the interval reaches its floor it is
    /// no longer recomputed.
    pub fn record_row(&mut self) -> u32 {
        self.rows_cleared += 1;
        let points = Self::points_for_row(self.rows_cleared);
        self.score += points;

        if self.drop_interval != MIN_DROP_INTERVAL {
            self.drop_interval = Self::interval_for(self.rows_cleared);
        }

        points
    }

    /// Accounts for `rows` rows cleared by one sweep. Returns the points gained.
    pub fn record_rows(&mut self, rows: usize) -> u32 {
        (0..rows).map(|_| self.record_row()).sum()
    }

    /// Adds frame time and reports whether gravity is due. The accumulator
    /// resets when it fires.
    pub fn accumulate(&mut self, delta_ms: f64) -> bool {
        if delta_ms.is_finite() && delta_ms > 0.0 {
            self.elapsed += delta_ms;
        }

        if self.elapsed > f64::from(self.drop_interval) {
            self.elapsed = 0.0;
            true
        } else {
            false
        }
    }
}
