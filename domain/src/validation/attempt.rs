//! Validation attempt — one failed pass over a tool call's arguments

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Snapshot of a single failed validation attempt.
///
/// Attempts are accumulated per tool-call id by the retry tracker. Once
/// recorded, an attempt never mutates; histories hand out clones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationAttempt {
    /// 1-based attempt number, strictly increasing per tool-call id.
    pub attempt_number: u32,
    /// Errors found during this attempt, in validator order.
    pub errors: Vec<ValidationError>,
    /// When the attempt was recorded.
    pub timestamp: DateTime<Utc>,
}

impl ValidationAttempt {
    pub fn new(attempt_number: u32, errors: Vec<ValidationError>) -> Self {
        Self {
            attempt_number,
            errors,
            timestamp: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::error::ViolationKind;

    #[test]
    fn attempt_keeps_error_order() {
        let errors = vec![
            ValidationError::violation(ViolationKind::RequiredMissing, "/b"),
            ValidationError::violation(ViolationKind::RequiredMissing, "/a"),
        ];

        let attempt = ValidationAttempt::new(1, errors);

        assert_eq!(attempt.attempt_number, 1);
        assert_eq!(attempt.errors[0].field_path, "/b");
        assert_eq!(attempt.errors[1].field_path, "/a");
    }
}
