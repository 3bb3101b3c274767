//! Configuration with YAML schema and validation.
//!
//! Mistakes are caught in three layers:
//! - serde rejects unknown keys and wrong types
//! - `validator` enforces numeric ranges
//! - [`ScopeConfig::validate_semantic`] checks cross-field rules

use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

use crate::error::{ScopeError, ScopeResult};
use crate::playback::speed::{Speed, SpeedPreset};
use crate::trace::TraceOptions;

/// Hard floor for any configured delay. Below this the timer would spin.
pub const DELAY_FLOOR_MS: u64 = Speed::FLOOR_MILLIS;

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ScopeConfig {
    /// Automatic stepping.
    #[validate(nested)]
    #[serde(default)]
    pub playback: PlaybackConfig,

    /// Narration subscribers.
    #[serde(default)]
    pub narration: NarrationConfig,

    /// Trace generation limits.
    #[validate(nested)]
    #[serde(default)]
    pub trace: TraceConfig,
}

impl ScopeConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - YAML parsing fails
    /// - Validation fails
    pub fn load<P: AsRef<Path>>(path: P) -> ScopeResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns error if parsing or validation fails.
    pub fn from_yaml(yaml: &str) -> ScopeResult<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.check()?;
        Ok(config)
    }

    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns error if serialization fails.
    pub fn to_yaml(&self) -> ScopeResult<String> {
        serde_yaml::to_string(self).map_err(|e| ScopeError::serialization(e.to_string()))
    }

    /// Create a builder for configuration.
    #[must_use]
    pub fn builder() -> ScopeConfigBuilder {
        ScopeConfigBuilder::default()
    }

    /// Run schema and semantic validation.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn check(&self) -> ScopeResult<()> {
        self.validate()?;
        self.validate_semantic()
    }

    fn validate_semantic(&self) -> ScopeResult<()> {
        let playback = &self.playback;
        if playback.min_delay_ms > playback.max_delay_ms {
            return Err(ScopeError::config(format!(
                "min_delay_ms ({}) exceeds max_delay_ms ({})",
                playback.min_delay_ms, playback.max_delay_ms
            )));
        }

        // The initial speed must satisfy the same bounds as later changes
        playback.initial_speed()?;

        Ok(())
    }

    /// Options handed to every trace generator.
    #[must_use]
    pub const fn trace_options(&self) -> TraceOptions {
        self.trace.options()
    }
}

/// Configuration builder for programmatic construction.
#[derive(Debug, Default)]
pub struct ScopeConfigBuilder {
    speed: Option<SpeedPreset>,
    custom_delay_ms: Option<u64>,
    delay_bounds: Option<(u64, u64)>,
    narration: Option<bool>,
    max_input_len: Option<usize>,
}

impl ScopeConfigBuilder {
    /// Set the preset speed.
    #[must_use]
    pub const fn speed(mut self, preset: SpeedPreset) -> Self {
        self.speed = Some(preset);
        self
    }

    /// Set a custom delay; overrides the preset.
    #[must_use]
    pub const fn custom_delay_ms(mut self, millis: u64) -> Self {
        self.custom_delay_ms = Some(millis);
        self
    }

    /// Set the accepted delay range.
    #[must_use]
    pub const fn delay_bounds(mut self, min_ms: u64, max_ms: u64) -> Self {
        self.delay_bounds = Some((min_ms, max_ms));
        self
    }

    /// Enable or disable narration.
    #[must_use]
    pub const fn narration(mut self, enabled: bool) -> Self {
        self.narration = Some(enabled);
        self
    }

    /// Set the maximum input length.
    #[must_use]
    pub const fn max_input_len(mut self, len: usize) -> Self {
        self.max_input_len = Some(len);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the result violates any constraint.
    pub fn build(self) -> ScopeResult<ScopeConfig> {
        let mut config = ScopeConfig::default();

        if let Some(preset) = self.speed {
            config.playback.speed = preset;
        }
        if let Some(millis) = self.custom_delay_ms {
            config.playback.custom_delay_ms = Some(millis);
        }
        if let Some((min, max)) = self.delay_bounds {
            config.playback.min_delay_ms = min;
            config.playback.max_delay_ms = max;
        }
        if let Some(enabled) = self.narration {
            config.narration.enabled = enabled;
        }
        if let Some(len) = self.max_input_len {
            config.trace.max_input_len = len;
        }

        config.check()?;
        Ok(config)
    }
}

/// Playback timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct PlaybackConfig {
    /// Preset used when no custom delay is set.
    #[serde(default)]
    pub speed: SpeedPreset,

    /// Custom delay between steps.
    #[serde(default)]
    pub custom_delay_ms: Option<u64>,

    /// Smallest accepted delay.
    #[validate(range(min = 50, max = 60_000))]
    #[serde(default = "default_min_delay")]
    pub min_delay_ms: u64,

    /// Largest accepted delay.
    #[validate(range(min = 50, max = 60_000))]
    #[serde(default = "default_max_delay")]
    pub max_delay_ms: u64,
}

const fn default_min_delay() -> u64 {
    Speed::MIN_MILLIS
}

const fn default_max_delay() -> u64 {
    Speed::MAX_MILLIS
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            speed: SpeedPreset::Normal,
            custom_delay_ms: None,
            min_delay_ms: default_min_delay(),
            max_delay_ms: default_max_delay(),
        }
    }
}

impl PlaybackConfig {
    /// Speed the controller starts with.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidSpeed`] if the custom delay is outside
    /// the configured bounds.
    pub fn initial_speed(&self) -> ScopeResult<Speed> {
        match self.custom_delay_ms {
            Some(millis) => self.speed_from_millis(millis),
            None => Ok(Speed::from_preset(self.speed)),
        }
    }

    /// Validate a delay against the configured bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::InvalidSpeed`] outside the bounds.
    pub fn speed_from_millis(&self, millis: u64) -> ScopeResult<Speed> {
        Speed::custom_within(
            millis,
            self.min_delay_ms.max(DELAY_FLOOR_MS),
            self.max_delay_ms,
        )
    }
}

/// Narration behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NarrationConfig {
    /// Speak at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Append the step highlight to the spoken text.
    #[serde(default = "default_true")]
    pub include_highlight: bool,
}

const fn default_true() -> bool {
    true
}

impl Default for NarrationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_highlight: true,
        }
    }
}

/// Trace generation limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct TraceConfig {
    /// Longest accepted input.
    #[validate(range(min = 1, max = 1024))]
    #[serde(default = "default_max_input_len")]
    pub max_input_len: usize,

    /// Attach a pseudocode line to each step.
    #[serde(default = "default_true")]
    pub attach_code: bool,

    /// Attach the complexity summary to each step.
    #[serde(default = "default_true")]
    pub attach_complexity: bool,
}

const fn default_max_input_len() -> usize {
    64
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            max_input_len: default_max_input_len(),
            attach_code: true,
            attach_complexity: true,
        }
    }
}

impl TraceConfig {
    /// Generator options for this section.
    #[must_use]
    pub const fn options(&self) -> TraceOptions {
        TraceOptions {
            max_input_len: self.max_input_len,
            attach_code: self.attach_code,
            attach_complexity: self.attach_complexity,
        }
    }
}
