//! Validation outcome — valid payload or ordered error list
//!
//! Data faults never throw through the normal flow: a failed validation is a
//! value, not an error, so it can feed the retry/escalation path.

use serde_json::Value;

use super::error::ValidationError;

/// Result of validating a tool call's arguments against its schema.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    /// The payload satisfied the schema.
    Valid(Value),
    /// The payload violated the schema; errors are in validator order.
    Invalid(Vec<ValidationError>),
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationOutcome::Valid(_))
    }

    /// Errors found, empty for a valid payload.
    pub fn errors(&self) -> &[ValidationError] {
        match self {
            ValidationOutcome::Valid(_) => &[],
            ValidationOutcome::Invalid(errors) => errors,
        }
    }

    /// The validated payload, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            ValidationOutcome::Valid(value) => Some(value),
            ValidationOutcome::Invalid(_) => None,
        }
    }

    pub fn into_payload(self) -> Option<Value> {
        match self {
            ValidationOutcome::Valid(value) => Some(value),
            ValidationOutcome::Invalid(_) => None,
        }
    }
}
