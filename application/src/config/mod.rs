//! Runtime configuration for the validation and recovery core
//!
//! [`RetryConfig`] controls the retry/feedback pipeline, [`TransformLimits`]
//! bounds the guided-decoding schema transformer. Both are plain values
//! loaded by the infrastructure config loader; out-of-range values are
//! configuration faults raised at load time, never at validation time.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// A configuration value outside its permitted range.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be between {min} and {max} (got {value})")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },
}

/// Controls for validation retries and model/human feedback rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum validation attempts per tool-call id (1–10).
    ///
    /// The exhaustion predicate is strictly `count > max_attempts`: the
    /// configured maximum itself is always a permitted attempt, and the
    /// check only trips on the attempt after it.
    pub max_attempts: u32,
    /// Hard budget for any formatted feedback message, in bytes (500–4000).
    pub max_message_length: usize,
    /// Maximum number of error lines shown per message.
    pub max_errors_shown: usize,
    /// Maximum length of an actual-value preview.
    pub max_value_preview: usize,
    /// Append corrective hints to retry feedback.
    pub include_hints: bool,
    /// Show sanitized actual values alongside errors.
    pub include_actual_values: bool,
    /// Keep per-attempt error history for escalation reports.
    pub track_history: bool,
    /// Redact secret-shaped values in previews.
    pub redact_secrets: bool,
    /// Replace absolute paths with short relative forms in previews.
    pub relativize_paths: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            max_message_length: 2000,
            max_errors_shown: 10,
            max_value_preview: 100,
            include_hints: true,
            include_actual_values: true,
            track_history: true,
            redact_secrets: true,
            relativize_paths: true,
        }
    }
}

impl RetryConfig {
    // ==================== Builder Methods ====================

    pub fn with_max_attempts(mut self, max: u32) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_max_message_length(mut self, max: usize) -> Self {
        self.max_message_length = max;
        self
    }

    pub fn with_max_errors_shown(mut self, max: usize) -> Self {
        self.max_errors_shown = max;
        self
    }

    pub fn with_max_value_preview(mut self, max: usize) -> Self {
        self.max_value_preview = max;
        self
    }

    pub fn with_hints(mut self, enabled: bool) -> Self {
        self.include_hints = enabled;
        self
    }

    pub fn with_actual_values(mut self, enabled: bool) -> Self {
        self.include_actual_values = enabled;
        self
    }

    pub fn with_history(mut self, enabled: bool) -> Self {
        self.track_history = enabled;
        self
    }

    /// Check all fields against their permitted ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=10).contains(&self.max_attempts) {
            return Err(ConfigError::OutOfRange {
                field: "retry.max_attempts",
                value: self.max_attempts as i64,
                min: 1,
                max: 10,
            });
        }
        if !(500..=4000).contains(&self.max_message_length) {
            return Err(ConfigError::OutOfRange {
                field: "retry.max_message_length",
                value: self.max_message_length as i64,
                min: 500,
                max: 4000,
            });
        }
        Ok(())
    }
}

/// Limits for the guided-decoding schema transformer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformLimits {
    /// Maximum post-resolution nesting depth along `properties`/`items`.
    pub max_depth: usize,
    /// Maximum canonical schema size in bytes.
    pub max_size: usize,
    /// Wall-clock budget for one transform, in milliseconds.
    pub timeout_ms: u64,
}

impl Default for TransformLimits {
    fn default() -> Self {
        Self {
            max_depth: 10,
            max_size: 65536,
            timeout_ms: 100,
        }
    }
}

impl TransformLimits {
    pub fn with_max_depth(mut self, max: usize) -> Self {
        self.max_depth = max;
        self
    }

    pub fn with_max_size(mut self, max: usize) -> Self {
        self.max_size = max;
        self
    }

    pub fn with_timeout_ms(mut self, ms: u64) -> Self {
        self.timeout_ms = ms;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::OutOfRange {
                field: "structured_output.max_depth",
                value: 0,
                min: 1,
                max: i64::MAX,
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::OutOfRange {
                field: "structured_output.timeout_ms",
                value: 0,
                min: 1,
                max: i64::MAX,
            });
        }
        Ok(())
    }
}
