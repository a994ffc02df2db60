//! Review tool call use case
//!
//! One model tool-call flows through here on every generation: validate the
//! arguments, and on failure decide between another model attempt and human
//! escalation. The use case owns no state of its own; attempt history lives
//! in the tracker, keyed by the caller's tool-call id.
//!
//! # Flow
//!
//! ```text
//! arguments ──▶ registry.validate ──▶ valid? ──▶ Accepted (history cleared)
//!                                      │
//!                                      ▼
//!                             tracker.record_attempt
//!                                      │
//!                   exceeded max? ────┼──── no ──▶ Retry (bounded feedback)
//!                                      │
//!                                     yes ──▶ Escalate (human report)
//! ```

use std::sync::Arc;

use argos_domain::RegistryError;
use serde_json::Value;

use crate::config::RetryConfig;
use crate::ports::{FeedbackFormatterPort, RetryTrackerPort, ToolRegistryPort};

/// Decision for one validated tool call.
#[derive(Debug, Clone)]
pub enum ToolCallDecision {
    /// Arguments are valid; hand the payload to the tool executor.
    Accepted(Value),
    /// Arguments are invalid and attempts remain; feed the message back to
    /// the model.
    Retry {
        feedback: String,
        attempt_number: u32,
    },
    /// Attempts are exhausted; hand the report to a human.
    Escalate { report: String },
}

/// Use case composing the registry, retry tracker, and feedback formatter.
pub struct ReviewToolCallUseCase {
    registry: Arc<dyn ToolRegistryPort>,
    tracker: Arc<dyn RetryTrackerPort>,
    formatter: Arc<dyn FeedbackFormatterPort>,
    max_attempts: u32,
}

impl ReviewToolCallUseCase {
    pub fn new(
        registry: Arc<dyn ToolRegistryPort>,
        tracker: Arc<dyn RetryTrackerPort>,
        formatter: Arc<dyn FeedbackFormatterPort>,
        config: &RetryConfig,
    ) -> Self {
        Self {
            registry,
            tracker,
            formatter,
            max_attempts: config.max_attempts,
        }
    }

    /// Validate one tool call and decide what happens next.
    ///
    /// An unknown tool is a configuration fault and surfaces as `Err`;
    /// invalid arguments are an expected data outcome and surface as
    /// [`ToolCallDecision::Retry`] or [`ToolCallDecision::Escalate`].
    pub fn execute(
        &self,
        tool_name: &str,
        tool_call_id: &str,
        arguments_json: &str,
    ) -> Result<ToolCallDecision, RegistryError> {
        let outcome = self.registry.validate_arguments(tool_name, arguments_json)?;

        match outcome {
            argos_domain::ValidationOutcome::Valid(payload) => {
                self.tracker.clear(tool_call_id);
                tracing::debug!(tool = tool_name, call = tool_call_id, "Arguments accepted");
                Ok(ToolCallDecision::Accepted(payload))
            }
            argos_domain::ValidationOutcome::Invalid(errors) => {
                let attempt_number = self.tracker.record_attempt(tool_call_id, errors.clone());

                if self.tracker.has_exceeded_max_retries(tool_call_id) {
                    let history = self.tracker.history(tool_call_id);
                    let report = self.formatter.format_escalation(
                        tool_name,
                        tool_call_id,
                        &history,
                        self.max_attempts,
                    );
                    tracing::warn!(
                        tool = tool_name,
                        call = tool_call_id,
                        attempts = attempt_number,
                        "Validation attempts exhausted, escalating"
                    );
                    Ok(ToolCallDecision::Escalate { report })
                } else {
                    let feedback = self.formatter.format_errors(
                        tool_name,
                        &errors,
                        attempt_number,
                        self.max_attempts,
                    );
                    tracing::debug!(
                        tool = tool_name,
                        call = tool_call_id,
                        attempt = attempt_number,
                        errors = errors.len(),
                        "Arguments rejected, requesting retry"
                    );
                    Ok(ToolCallDecision::Retry {
                        feedback,
                        attempt_number,
                    })
                }
            }
        }
    }
}
