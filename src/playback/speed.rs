//! Playback speed: the delay between automatic steps.

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ScopeError, ScopeResult};

/// Named speeds offered by hosts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeedPreset {
    /// 2000 ms.
    VerySlow,
    /// 1500 ms.
    Slow,
    /// 1000 ms.
    #[default]
    Normal,
    /// 500 ms.
    Fast,
    /// 200 ms.
    VeryFast,
}

impl SpeedPreset {
    /// All presets, slowest first.
    pub const ALL: [Self; 5] = [
        Self::VerySlow,
        Self::Slow,
        Self::Normal,
        Self::Fast,
        Self::VeryFast,
    ];

    /// Delay between steps in milliseconds.
    #[must_use]
    pub const fn millis(self) -> u64 {
        match self {
            Self::VerySlow => 2000,
            Self::Slow => 1500,
            Self::Normal => 1000,
            Self::Fast => 500,
            Self::VeryFast => 200,
        }
    }

    /// Config and CLI label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VerySlow => "very_slow",
            Self::Slow => "slow",
            Self::Normal => "normal",
            Self::Fast => "fast",
            Self::VeryFast => "very_fast",
        }
    }
}

impl fmt::Display for SpeedPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for SpeedPreset {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Self::ALL
            .into_iter()
            .find(|p| p.label() == normalized)
            .ok_or_else(|| {
                ScopeError::invalid_input(format!(
                    "unknown speed '{s}' (expected very_slow, slow, normal, fast, very_fast or milliseconds)"
                ))
            })
    }
}

/// Delay between automatic steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Speed {
    millis: u64,
}

impl Speed {
    /// Lower bound accepted by [`Speed::custom`].
    pub const MIN_MILLIS: u64 = 200;
    /// Upper bound accepted by [`Speed::custom`].
    pub const MAX_MILLIS: u64 = 2000;
    /// No delay may go below this, whatever bounds the caller passes.
    pub const FLOOR_MILLIS: u64 = 50;

    /// Delay of a named preset.
    #[must_use]
    pub const fn from_preset(preset: SpeedPreset) -> Self {
        Self {
            millis: preset.millis(),
        }
    }

    /// Custom delay within the default range.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidSpeed`] outside `200..=2000` ms.
    pub fn custom(millis: u64) -> ScopeResult<Self> {
        Self::custom_within(millis, Self::MIN_MILLIS, Self::MAX_MILLIS)
    }

    /// Custom delay within `min..=max` ms. `min` is raised to
    /// [`Speed::FLOOR_MILLIS`] so the timer period stays positive.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidSpeed`] outside the range.
    pub fn custom_within(millis: u64, min: u64, max: u64) -> ScopeResult<Self> {
        let min = min.max(Self::FLOOR_MILLIS);
        if millis < min || millis > max {
            return Err(ScopeError::InvalidSpeed { millis, min, max });
        }
        Ok(Self { millis })
    }

    /// Delay in milliseconds.
    #[must_use]
    pub const fn millis(self) -> u64 {
        self.millis
    }

    /// Delay as a [`Duration`].
    #[must_use]
    pub const fn delay(self) -> Duration {
        Duration::from_millis(self.millis)
    }

    /// Matching preset, if this speed is one.
    #[must_use]
    pub fn preset(self) -> Option<SpeedPreset> {
        SpeedPreset::ALL.into_iter().find(|p| p.millis() == self.millis)
    }
}

impl Default for Speed {
    fn default() -> Self {
        Self::from_preset(SpeedPreset::Normal)
    }
}

impl From<SpeedPreset> for Speed {
    fn from(preset: SpeedPreset) -> Self {
        Self::from_preset(preset)
    }
}

impl fmt::Display for Speed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.preset() {
            Some(preset) => write!(f, "{preset} ({}ms)", self.millis),
            None => write!(f, "{}ms", self.millis),
        }
    }
}

/// Accepts a preset label or a millisecond count (`750`, `750ms`).
impl FromStr for Speed {
    type Err = ScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_suffix("ms").unwrap_or(trimmed).trim();
        match digits.parse::<u64>() {
            Ok(millis) => Self::custom(millis),
            Err(_) => SpeedPreset::from_str(trimmed).map(Self::from_preset),
        }
    }
}
