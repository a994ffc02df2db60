//! Feedback formatter port
//!
//! Renders bounded plain-text messages: retry feedback appended to the next
//! model turn, and escalation reports handed to a human operator.

use argos_domain::{ValidationAttempt, ValidationError};

/// Port for formatting validation feedback.
///
/// Both outputs are hard-bounded by the configured message budget; callers
/// may append them to prompts or notifications without further truncation.
pub trait FeedbackFormatterPort: Send + Sync {
    /// Model-facing retry message for one failed attempt.
    fn format_errors(
        &self,
        tool_name: &str,
        errors: &[ValidationError],
        attempt_number: u32,
        max_attempts: u32,
    ) -> String;

    /// Human-facing escalation report over the full attempt history.
    fn format_escalation(
        &self,
        tool_name: &str,
        tool_call_id: &str,
        history: &[ValidationAttempt],
        max_attempts: u32,
    ) -> String;
}
