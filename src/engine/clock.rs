//! Playback clock management.
//!
//! The clock only moves when the host advances it, which keeps every test
//! of timer-driven playback deterministic.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::engine::PlayTime;

/// Playback clock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlaybackClock {
    /// Current playback time.
    current: PlayTime,
    /// Number of times the clock has been advanced.
    advance_count: u64,
}

impl PlaybackClock {
    /// Create a clock at [`PlayTime::ZERO`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current playback time.
    #[must_use]
    pub const fn now(&self) -> PlayTime {
        self.current
    }

    /// Number of `advance` calls since creation or reset.
    #[must_use]
    pub const fn advance_count(&self) -> u64 {
        self.advance_count
    }

    /// Advance the clock by `elapsed`.
    ///
    /// Returns the new time.
    pub fn advance(&mut self, elapsed: Duration) -> PlayTime {
        self.current = self.current.saturating_add(elapsed);
        self.advance_count += 1;
        self.current
    }

    /// Move the clock forward to `target`. Never moves backwards.
    pub fn advance_to(&mut self, target: PlayTime) -> PlayTime {
        if target > self.current {
            self.current = target;
            self.advance_count += 1;
        }
        self.current
    }

    /// Time remaining until `target`, zero if it has already passed.
    #[must_use]
    pub fn time_until(&self, target: PlayTime) -> Duration {
        (target - self.current).as_duration()
    }

    /// Reset clock to initial state.
    pub fn reset(&mut self) {
        self.current = PlayTime::ZERO;
        self.advance_count = 0;
    }
}
