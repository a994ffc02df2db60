//! Error aggregation before formatting
//!
//! Models frequently emit the same mistake at the same location several
//! times per payload. Aggregation keeps feedback readable: duplicates by
//! `(field_path, code)` collapse to the first occurrence, the rest sort
//! errors-first then by path, and the list is capped at the configured
//! display limit.

use std::collections::HashSet;

use argos_domain::ValidationError;

/// Deduplicates, orders, and caps validation errors for display.
#[derive(Debug, Clone)]
pub struct ErrorAggregator {
    max_errors: usize,
}

impl ErrorAggregator {
    pub fn new(max_errors: usize) -> Self {
        Self { max_errors }
    }

    /// Aggregate errors for display.
    ///
    /// Order: severity descending (errors first), then field path ascending.
    /// Within a duplicate `(field_path, code)` group the first message wins.
    pub fn aggregate(&self, errors: &[ValidationError]) -> Vec<ValidationError> {
        let mut seen = HashSet::new();
        let mut unique: Vec<ValidationError> = errors
            .iter()
            .filter(|error| seen.insert((error.field_path.clone(), error.code())))
            .cloned()
            .collect();

        unique.sort_by(|a, b| {
            b.severity
                .cmp(&a.severity)
                .then_with(|| a.field_path.cmp(&b.field_path))
        });
        unique.truncate(self.max_errors);
        unique
    }
}
