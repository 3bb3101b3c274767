//! Playback timing engine.
//!
//! Time is explicit rather than ambient:
//! - [`PlayTime`]: fixed-point playback time in nanoseconds
//! - [`PlaybackClock`]: the controller's notion of "now", advanced by the host
//! - [`TimerScheduler`]: cancellable timer ticks with deterministic ordering
//!
//! Nothing in here sleeps or spawns; a host advances the clock either from a
//! UI frame loop or from [`crate::playback::driver::RealtimeDriver`].

pub mod clock;
pub mod scheduler;

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub use clock::PlaybackClock;
pub use scheduler::{ScheduledTick, TimerHandle, TimerId, TimerScheduler};

/// Playback time representation.
///
/// Fixed-point nanoseconds so that tick ordering never depends on float
/// rounding.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct PlayTime {
    /// Time in nanoseconds since the clock was created.
    nanos: u64,
}

impl PlayTime {
    /// Zero time (clock start).
    pub const ZERO: Self = Self { nanos: 0 };

    /// Create time from nanoseconds.
    #[must_use]
    pub const fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Create time from milliseconds.
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            nanos: millis.saturating_mul(1_000_000),
        }
    }

    /// Create time from a [`Duration`], saturating at `u64::MAX` nanoseconds.
    #[must_use]
    pub fn from_duration(duration: Duration) -> Self {
        Self {
            nanos: u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX),
        }
    }

    /// Get time as nanoseconds.
    #[must_use]
    pub const fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Get time as whole milliseconds.
    #[must_use]
    pub const fn as_millis(&self) -> u64 {
        self.nanos / 1_000_000
    }

    /// Convert to a [`Duration`].
    #[must_use]
    pub const fn as_duration(&self) -> Duration {
        Duration::from_nanos(self.nanos)
    }

    /// Add a duration, saturating at the maximum representable time.
    #[must_use]
    pub fn saturating_add(self, duration: Duration) -> Self {
        Self {
            nanos: self.nanos.saturating_add(Self::from_duration(duration).nanos),
        }
    }
}

impl std::ops::Add for PlayTime {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            nanos: self.nanos.saturating_add(rhs.nanos),
        }
    }
}

impl std::ops::Sub for PlayTime {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            nanos: self.nanos.saturating_sub(rhs.nanos),
        }
    }
}

impl std::fmt::Display for PlayTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}ms", self.as_millis())
    }
}
