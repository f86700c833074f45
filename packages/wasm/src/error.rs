//! Error types for AlgoViz.
//!
//! Every fallible operation returns `VizResult<T>`. Steppers only fail during
//! input validation; once a sequence is being generated they cannot fail.

use thiserror::Error;

use crate::playback::PlaybackState;

/// Result type alias for AlgoViz operations.
pub type VizResult<T> = Result<T, VizError>;

/// Unified error type for all AlgoViz operations.
#[derive(Debug, Error)]
pub enum VizError {
    /// Malformed, empty, out-of-range or oversized user input.
    ///
    /// Surfaced inline to the user; the requested operation is not started.
    #[error("invalid input: {message}")]
    InvalidInput {
        /// User-facing description of what is wrong.
        message: String,
    },

    /// The run was cancelled by the user. Never shown as an error.
    #[error("run cancelled")]
    RunCancelled,

    /// A should-never-happen state, e.g. a cursor outside the sequence.
    #[error("internal invariant violated: {message}")]
    InternalInvariantViolation {
        /// What was found to be inconsistent.
        message: String,
    },

    /// A control action that the driver cannot honour in its current state.
    #[error("cannot {action} while {from}")]
    InvalidTransition {
        /// State the driver was in.
        from: PlaybackState,
        /// Action that was requested.
        action: &'static str,
    },

    /// Invalid configuration parameter.
    #[error("configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    /// Configuration (de)serialization failure.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VizError {
    /// Create an invalid input error with a message.
    #[must_use]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Create an invariant violation error.
    #[must_use]
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InternalInvariantViolation {
            message: message.into(),
        }
    }

    /// Create a configuration error with a message.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Whether the error should be shown to the user.
    ///
    /// Cancellation is silent.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, Self::RunCancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_display() {
        let err = VizError::invalid_input("array is empty");
        assert_eq!(err.to_string(), "invalid input: array is empty");
        assert!(err.is_user_visible());
    }

    #[test]
    fn test_cancelled_is_silent() {
        assert!(!VizError::RunCancelled.is_user_visible());
    }

    #[test]
    fn test_invalid_transition_display() {
        let err = VizError::InvalidTransition {
            from: PlaybackState::Idle,
            action: "pause",
        };
        assert_eq!(err.to_string(), "cannot pause while idle");
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: VizError = parse.unwrap_err().into();
        assert!(matches!(err, VizError::Json(_)));
    }
}
