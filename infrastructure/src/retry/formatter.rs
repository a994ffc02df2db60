//! Error and escalation formatting
//!
//! Renders validation failures into bounded plain text. Two audiences:
//! retry feedback is written for the model (what went wrong, how to fix it),
//! escalation reports for a human operator (the full attempt history).
//!
//! Every message is hard-bounded by `max_message_length`. When the cut
//! point lands past half the budget the truncation backs off to the last
//! newline and appends a `(message truncated)` marker; a message is never
//! cut mid-line when a safer boundary exists within that window.

use argos_application::config::RetryConfig;
use argos_application::ports::feedback::FeedbackFormatterPort;
use argos_domain::{ValidationAttempt, ValidationError, ViolationKind};
use chrono::SecondsFormat;

use super::aggregator::ErrorAggregator;
use super::sanitizer::ValueSanitizer;

const TRUNCATION_MARKER: &str = "\n(message truncated)";
/// Errors shown per attempt in an escalation report.
const ESCALATION_ERRORS_PER_ATTEMPT: usize = 3;

/// Formats validation errors into model- and human-facing messages.
pub struct ErrorFormatter {
    config: RetryConfig,
    sanitizer: ValueSanitizer,
    aggregator: ErrorAggregator,
}

impl ErrorFormatter {
    pub fn new(config: RetryConfig) -> Self {
        let sanitizer = ValueSanitizer::new(
            config.max_value_preview,
            config.redact_secrets,
            config.relativize_paths,
        );
        let aggregator = ErrorAggregator::new(config.max_errors_shown);
        Self {
            config,
            sanitizer,
            aggregator,
        }
    }

    fn error_line(&self, error: &ValidationError) -> String {
        let path = if error.field_path.is_empty() {
            "/"
        } else {
            &error.field_path
        };
        let mut line = format!(
            "[{}] {} at {}: {}\n",
            error.severity,
            error.code(),
            path,
            error.message
        );

        if self.config.include_actual_values {
            if let Some(expected) = &error.expected {
                line.push_str(&format!("  expected: {}\n", expected));
            }
            if let Some(actual) = &error.actual {
                line.push_str(&format!(
                    "  actual: {}\n",
                    self.sanitizer.sanitize(actual, &error.field_path)
                ));
            }
        }

        line
    }

    fn append_hints(&self, out: &mut String, errors: &[ValidationError]) {
        let mut hints = Vec::new();
        for error in errors {
            if let Some(hint) = hint_for(error) {
                if !hints.contains(&hint) {
                    hints.push(hint);
                }
            }
        }
        if hints.is_empty() {
            return;
        }

        out.push_str("\nHints:\n");
        for hint in hints {
            out.push_str(&format!("  - {}\n", hint));
        }
    }
}

impl FeedbackFormatterPort for ErrorFormatter {
    fn format_errors(
        &self,
        tool_name: &str,
        errors: &[ValidationError],
        attempt_number: u32,
        max_attempts: u32,
    ) -> String {
        let header = format!(
            "Validation failed for tool '{}' (attempt {} of {}):",
            tool_name, attempt_number, max_attempts
        );

        if errors.is_empty() {
            return truncate_to_budget(
                format!("{} verify the input format and try again.", header),
                self.config.max_message_length,
            );
        }

        let aggregated = self.aggregator.aggregate(errors);
        let hidden = errors.len().saturating_sub(aggregated.len());

        let mut out = String::new();
        out.push_str(&header);
        out.push_str("\n\n");

        for error in &aggregated {
            out.push_str(&self.error_line(error));
        }

        if hidden > 0 {
            out.push_str(&format!("... and {} more\n", hidden));
        }

        if self.config.include_hints {
            self.append_hints(&mut out, &aggregated);
        }

        out.push_str("\nCorrect the arguments and call the tool again.");

        truncate_to_budget(out, self.config.max_message_length)
    }

    fn format_escalation(
        &self,
        tool_name: &str,
        tool_call_id: &str,
        history: &[ValidationAttempt],
        max_attempts: u32,
    ) -> String {
        let mut out = format!(
            "Tool '{}' (call '{}') failed validation {} times (maximum {} attempts).\n",
            tool_name,
            tool_call_id,
            history.len(),
            max_attempts
        );

        for attempt in history {
            out.push_str(&format!(
                "\nAttempt {} at {}:\n",
                attempt.attempt_number,
                attempt
                    .timestamp
                    .to_rfc3339_opts(SecondsFormat::Secs, true)
            ));
            for error in attempt.errors.iter().take(ESCALATION_ERRORS_PER_ATTEMPT) {
                out.push_str("  ");
                out.push_str(&self.error_line(error));
            }
            if attempt.errors.len() > ESCALATION_ERRORS_PER_ATTEMPT {
                out.push_str(&format!(
                    "  ... and {} more errors\n",
                    attempt.errors.len() - ESCALATION_ERRORS_PER_ATTEMPT
                ));
            }
        }

        out.push_str("\nUser intervention required.");

        truncate_to_budget(out, self.config.max_message_length)
    }
}

/// Corrective hint for an error, when the kind admits one.
fn hint_for(error: &ValidationError) -> Option<String> {
    let field = error.field_name();
    match error.kind {
        ViolationKind::RequiredMissing => Some(format!("Add the required field '{}'", field)),
        ViolationKind::TypeMismatch => Some(match &error.expected {
            Some(expected) => format!("Change '{}' to type {}", field, expected),
            None => format!("Check the type of '{}'", field),
        }),
        ViolationKind::NotInEnum => error
            .expected
            .as_ref()
            .map(|options| format!("Use one of: {}", options)),
        ViolationKind::PatternMismatch => error
            .expected
            .as_ref()
            .map(|pattern| format!("Match the pattern: {}", pattern)),
        ViolationKind::NumberRange => error
            .expected
            .as_ref()
            .map(|range| format!("Use a value {}", range)),
        ViolationKind::StringLength => {
            Some("Adjust the string length to meet the constraints".to_string())
        }
        ViolationKind::ArrayLength => {
            Some("Adjust the array length to meet the constraints".to_string())
        }
        ViolationKind::UnknownField => Some(format!("Remove the unrecognized field '{}'", field)),
        _ => None,
    }
}

/// Hard-truncate to `max` bytes, preferring a newline boundary.
///
/// The newline back-off only applies when the boundary falls past half the
/// budget; otherwise the text is cut at the budget on a char boundary.
fn truncate_to_budget(mut text: String, max: usize) -> String {
    if text.len() <= max {
        return text;
    }

    let window_end = floor_char_boundary(&text, max.saturating_sub(TRUNCATION_MARKER.len()));
    if let Some(newline) = text[..window_end].rfind('\n') {
        if newline >= max / 2 {
            text.truncate(newline);
            text.push_str(TRUNCATION_MARKER);
            return text;
        }
    }

    let cut = floor_char_boundary(&text, max);
    text.truncate(cut);
    text
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    if index >= text.len() {
        return text.len();
    }
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;
    use argos_domain::{Severity, ValidationError};

    fn formatter() -> ErrorFormatter {
        ErrorFormatter::new(RetryConfig::default())
    }

    fn missing_content() -> ValidationError {
        ValidationError::violation(ViolationKind::RequiredMissing, "/content")
    }

    #[test]
    fn header_names_tool_and_attempt() {
        let message = formatter().format_errors("write_file", &[missing_content()], 2, 3);

        assert!(message.starts_with("Validation failed for tool 'write_file' (attempt 2 of 3):"));
    }

    #[test]
    fn error_lines_follow_the_severity_code_path_template() {
        let message = formatter().format_errors("write_file", &[missing_content()], 1, 3);

        assert!(message.contains("[error] VAL-001 at /content:"));
        assert!(message.contains("Correct the arguments and call the tool again."));
    }

    #[test]
    fn empty_errors_produce_the_generic_notice() {
        let message = formatter().format_errors("write_file", &[], 1, 3);

        assert!(message.contains("verify the input format"));
    }

    #[test]
    fn overflow_errors_collapse_into_a_summary() {
        let config = RetryConfig::default().with_max_errors_shown(2);
        let formatter = ErrorFormatter::new(config);
        let errors: Vec<ValidationError> = (0..5)
            .map(|i| {
                ValidationError::violation(
                    ViolationKind::TypeMismatch,
                    format!("/field{}", i),
                )
            })
            .collect();

        let message = formatter.format_errors("write_file", &errors, 1, 3);

        assert!(message.contains("... and 3 more"));
        assert!(!message.contains("/field4"));
    }

    #[test]
    fn hints_are_deduplicated_and_toggleable() {
        let errors = vec![
            missing_content(),
            ValidationError::violation(ViolationKind::RequiredMissing, "/content"),
        ];

        let with_hints = formatter().format_errors("write_file", &errors, 1, 3);
        assert_eq!(with_hints.matches("Add the required field 'content'").count(), 1);

        let without = ErrorFormatter::new(RetryConfig::default().with_hints(false))
            .format_errors("write_file", &errors, 1, 3);
        assert!(!without.contains("Hints:"));
    }

    #[test]
    fn actual_values_are_sanitized() {
        let error = ValidationError::violation(ViolationKind::TypeMismatch, "/password")
            .with_actual("\"hunter2\"");

        let message = formatter().format_errors("login", &[error], 1, 3);

        assert!(message.contains("[REDACTED:SENSITIVE_FIELD]"));
        assert!(!message.contains("hunter2"));
    }

    #[test]
    fn output_never_exceeds_the_message_budget() {
        let config = RetryConfig::default().with_max_message_length(500);
        let formatter = ErrorFormatter::new(config);
        let errors: Vec<ValidationError> = (0..50)
            .map(|i| {
                ValidationError::violation(
                    ViolationKind::PatternMismatch,
                    format!("/deeply/nested/structure/field_number_{}", i),
                )
                .with_expected("^[a-z][a-z0-9_-]{4,63}$")
                .with_actual("\"Some Rather Long Offending Value That Keeps Going\"")
            })
            .collect();

        let message = formatter.format_errors("write_file", &errors, 3, 3);

        assert!(message.len() <= 500);
    }

    #[test]
    fn truncation_backs_off_to_a_newline() {
        let config = RetryConfig::default().with_max_message_length(500);
        let formatter = ErrorFormatter::new(config);
        let errors: Vec<ValidationError> = (0..40)
            .map(|i| {
                ValidationError::violation(ViolationKind::TypeMismatch, format!("/f{}", i))
            })
            .collect();

        let message = formatter.format_errors("write_file", &errors, 1, 3);

        assert!(message.ends_with("(message truncated)"));
        // The char before the marker is a line boundary, not a split line.
        let body = message.strip_suffix(TRUNCATION_MARKER).unwrap();
        assert!(!body.is_empty());
        assert!(message.len() <= 500);
    }

    #[test]
    fn escalation_lists_every_attempt() {
        let history = vec![
            ValidationAttempt::new(1, vec![missing_content()]),
            ValidationAttempt::new(2, vec![missing_content()]),
            ValidationAttempt::new(3, vec![missing_content()]),
            ValidationAttempt::new(4, vec![missing_content()]),
        ];

        let report = formatter().format_escalation("write_file", "call-1", &history, 3);

        assert!(report.contains("failed validation 4 times (maximum 3 attempts)"));
        for n in 1..=4 {
            assert!(report.contains(&format!("Attempt {} at ", n)));
        }
        assert!(report.ends_with("User intervention required."));
    }

    #[test]
    fn escalation_caps_errors_per_attempt() {
        let errors: Vec<ValidationError> = (0..5)
            .map(|i| {
                ValidationError::violation(ViolationKind::TypeMismatch, format!("/f{}", i))
            })
            .collect();
        let history = vec![ValidationAttempt::new(1, errors)];

        let report = formatter().format_escalation("write_file", "call-1", &history, 3);

        assert!(report.contains("... and 2 more errors"));
        assert!(!report.contains("/f4"));
    }

    #[test]
    fn escalation_respects_the_message_budget() {
        let config = RetryConfig::default().with_max_message_length(600);
        let formatter = ErrorFormatter::new(config);
        let history: Vec<ValidationAttempt> = (1..=10)
            .map(|n| {
                ValidationAttempt::new(
                    n,
                    vec![ValidationError::new(
                        ViolationKind::PatternMismatch,
                        "/name",
                        "Does not match the required pattern.".to_string(),
                        Severity::Error,
                    )],
                )
            })
            .collect();

        let report = formatter.format_escalation("write_file", "call-1", &history, 3);

        assert!(report.len() <= 600);
        assert!(report.ends_with("(message truncated)"));
    }

    #[test]
    fn short_text_is_not_truncated() {
        assert_eq!(truncate_to_budget("short".to_string(), 100), "short");
    }

    #[test]
    fn hard_cut_respects_char_boundaries() {
        // Multi-byte characters with no newline in the back-off window.
        let text = "é".repeat(400);
        let result = truncate_to_budget(text, 501);

        assert!(result.len() <= 501);
        assert!(result.chars().all(|c| c == 'é'));
    }
}
