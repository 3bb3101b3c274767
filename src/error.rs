//! Error types for algoscope.
//!
//! Every fallible operation returns `Result<T, ScopeError>`; nothing in the
//! library panics on bad input. Narration subscribers report their own
//! [`crate::narration::NarrationError`], which never reaches this type.

use thiserror::Error;

/// Result type alias for algoscope operations.
pub type ScopeResult<T> = Result<T, ScopeError>;

/// Unified error type for trace generation, configuration and playback.
#[derive(Debug, Error)]
pub enum ScopeError {
    // ===== Trace Generation =====
    /// Input could not be turned into a trace (non-numeric token, no values,
    /// unsorted input for a search that needs sorted data, ...).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// What was wrong with the input.
        message: String,
    },

    /// A search algorithm was invoked without a target value.
    #[error("Algorithm '{algorithm}' requires a target value")]
    MissingTarget {
        /// Name of the algorithm.
        algorithm: String,
    },

    /// A generator produced a sequence that breaks the trace contract.
    #[error("Malformed trace: {reason}")]
    MalformedTrace {
        /// Which rule was broken.
        reason: String,
    },

    /// No generator registered under this name.
    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    // ===== Playback =====
    /// Playback was requested but no steps are loaded.
    #[error("No steps available")]
    NoSteps,

    /// Custom speed outside the accepted delay range.
    #[error("Speed {millis}ms outside accepted range {min}..={max}ms")]
    InvalidSpeed {
        /// Requested inter-step delay.
        millis: u64,
        /// Lower bound.
        min: u64,
        /// Upper bound.
        max: u64,
    },

    // ===== Configuration =====
    /// Invalid configuration parameter.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// YAML parsing error.
    #[error("YAML parsing error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    // ===== I/O =====
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ScopeError {
    /// Create an invalid-input error with a message.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create a missing-target error for the named algorithm.
    #[must_use]
    pub fn missing_target(algorithm: impl Into<String>) -> Self {
        Self::MissingTarget {
            algorithm: algorithm.into(),
        }
    }

    /// Create a malformed-trace error.
    #[must_use]
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedTrace {
            reason: reason.into(),
        }
    }

    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a serialization error.
    #[must_use]
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization(message.into())
    }

    /// Whether the caller can fix this by editing the input and rerunning.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidInput { .. } | Self::MissingTarget { .. } | Self::UnknownAlgorithm(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_detection() {
        assert!(ScopeError::invalid_input("abc is not a number").is_input_error());
        assert!(ScopeError::missing_target("binary_search").is_input_error());
        assert!(ScopeError::UnknownAlgorithm("bogo".to_string()).is_input_error());

        assert!(!ScopeError::NoSteps.is_input_error());
        assert!(!ScopeError::config("bad").is_input_error());
    }

    #[test]
    fn test_error_invalid_input_display() {
        let msg = ScopeError::invalid_input("token 'x' is not a number").to_string();
        assert!(msg.contains("Invalid input"));
        assert!(msg.contains("token 'x'"));
    }

    #[test]
    fn test_error_missing_target_display() {
        let msg = ScopeError::missing_target("linear_search").to_string();
        assert!(msg.contains("linear_search"));
        assert!(msg.contains("target"));
    }

    #[test]
    fn test_error_malformed_display() {
        let err = ScopeError::malformed("trace must end in a terminal step");
        assert!(!err.is_input_error());
        assert!(err.to_string().contains("Malformed trace"));
    }

    #[test]
    fn test_error_no_steps_display() {
        assert_eq!(ScopeError::NoSteps.to_string(), "No steps available");
    }

    #[test]
    fn test_error_invalid_speed_display() {
        let err = ScopeError::InvalidSpeed {
            millis: 50,
            min: 200,
            max: 2000,
        };
        let msg = err.to_string();
        assert!(msg.contains("50ms"));
        assert!(msg.contains("200..=2000"));
    }

    #[test]
    fn test_error_config() {
        let msg = ScopeError::config("min_delay_ms exceeds max_delay_ms").to_string();
        assert!(msg.contains("Configuration error"));
        assert!(msg.contains("min_delay_ms"));
    }

    #[test]
    fn test_error_serialization() {
        let msg = ScopeError::serialization("failed to encode").to_string();
        assert!(msg.contains("Serialization error"));
    }

    #[test]
    fn test_error_from_yaml() {
        let parse: Result<u32, _> = serde_yaml::from_str("[not, a, number]");
        let err: ScopeError = parse.err().map(ScopeError::from).unwrap_or(ScopeError::NoSteps);
        assert!(matches!(err, ScopeError::YamlParse(_)));
    }

    #[test]
    fn test_error_debug() {
        let debug = format!("{:?}", ScopeError::config("test"));
        assert!(debug.contains("Config"));
    }
}
