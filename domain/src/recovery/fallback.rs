//! Fallback value objects — recovery state for invalid guided-decoding output
//!
//! The fallback handler is a shallow decision procedure: all state lives in
//! the caller-supplied [`FallbackContext`], and every decision comes back as
//! an immutable [`FallbackResult`]. Nothing here performs I/O; "retry" means
//! asking the caller to re-invoke the model.

use serde::{Deserialize, Serialize};

/// How much control the runtime has over the generating backend when
/// recovering from bad output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackMode {
    /// The runtime owns the backend process and can freely regenerate.
    Managed,
    /// The runtime observes the backend but does not control its lifecycle.
    Monitored,
    /// The backend is an external service; regeneration is best-effort.
    External,
}

impl FallbackMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FallbackMode::Managed => "managed",
            FallbackMode::Monitored => "monitored",
            FallbackMode::External => "external",
        }
    }
}

impl std::fmt::Display for FallbackMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a fallback attempt ended the way it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallbackReason {
    /// Valid JSON was extracted from the invalid output and passed the schema.
    ExtractionSucceeded,
    /// The caller should re-invoke the model for a fresh generation.
    RegenerationRequired,
    /// The attempt budget is exhausted; recovery failed terminally.
    MaxAttemptsExceeded,
    /// Nothing more can be done with the available context.
    Unrecoverable,
}

/// Mutable per-recovery state owned by the caller.
///
/// Created when a guided-decoding response fails validation, threaded through
/// each `handle` call, and discarded when recovery ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallbackContext {
    /// Model that produced the invalid output.
    pub model_id: String,
    /// Backend control mode.
    pub fallback_mode: FallbackMode,
    /// The validation failure that triggered recovery.
    pub validation_error: String,
    /// Attempts consumed so far.
    pub fallback_attempts: u32,
    /// Attempt budget.
    pub max_fallback_attempts: u32,
    /// The invalid output, when available for extraction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_output: Option<String>,
    /// Whether the caller is able to re-invoke the model.
    pub should_regenerate_output: bool,
}

impl FallbackContext {
    pub fn new(model_id: impl Into<String>, fallback_mode: FallbackMode) -> Self {
        Self {
            model_id: model_id.into(),
            fallback_mode,
            validation_error: String::new(),
            fallback_attempts: 0,
            max_fallback_attempts: 3,
            invalid_output: None,
            should_regenerate_output: true,
        }
    }

    pub fn with_validation_error(mut self, error: impl Into<String>) -> Self {
        self.validation_error = error.into();
        self
    }

    pub fn with_invalid_output(mut self, output: impl Into<String>) -> Self {
        self.invalid_output = Some(output.into());
        self
    }

    pub fn with_max_fallback_attempts(mut self, max: u32) -> Self {
        self.max_fallback_attempts = max;
        self
    }

    pub fn with_regeneration(mut self, enabled: bool) -> Self {
        self.should_regenerate_output = enabled;
        self
    }
}

/// Immutable outcome of one fallback decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FallbackResult {
    pub success: bool,
    pub reason: FallbackReason,
    pub message: String,
    /// Recovered output, present only for `ExtractionSucceeded`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corrected_output: Option<String>,
    /// Whether the caller should re-invoke the model.
    pub should_retry: bool,
}

impl FallbackResult {
    pub fn extraction_succeeded(corrected_output: impl Into<String>) -> Self {
        Self {
            success: true,
            reason: FallbackReason::ExtractionSucceeded,
            message: "Recovered valid output by extraction".to_string(),
            corrected_output: Some(corrected_output.into()),
            should_retry: false,
        }
    }

    pub fn regeneration_required(message: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: FallbackReason::RegenerationRequired,
            message: message.into(),
            corrected_output: None,
            should_retry: true,
        }
    }

    pub fn max_attempts_exceeded(attempts: u32, max: u32) -> Self {
        Self {
            success: false,
            reason: FallbackReason::MaxAttemptsExceeded,
            message: format!("Fallback attempts exhausted ({} of {})", attempts, max),
            corrected_output: None,
            should_retry: false,
        }
    }

    pub fn unrecoverable(message: impl Into<String>) -> Self {
        Self {
            success: false,
            reason: FallbackReason::Unrecoverable,
            message: message.into(),
            corrected_output: None,
            should_retry: false,
        }
    }
}
