//! Retry tracker port
//!
//! Thread-safe attempt counting and error history per tool-call id.

use argos_domain::{ValidationAttempt, ValidationError};

/// Port for tracking validation attempts per tool-call id.
///
/// Implementations must isolate unrelated ids: concurrent calls for
/// different ids never contend on a shared lock.
pub trait RetryTrackerPort: Send + Sync {
    /// Record a failed attempt and return its 1-based attempt number.
    fn record_attempt(&self, tool_call_id: &str, errors: Vec<ValidationError>) -> u32;

    /// Number of attempts recorded for this id (0 when unknown).
    fn attempt_count(&self, tool_call_id: &str) -> u32;

    /// Ordered, immutable snapshot of the attempt history.
    fn history(&self, tool_call_id: &str) -> Vec<ValidationAttempt>;

    /// Strictly `count > max_attempts`: the configured maximum is itself a
    /// permitted attempt; the predicate trips on the next check after it.
    fn has_exceeded_max_retries(&self, tool_call_id: &str) -> bool;

    /// Drop all history for this id (on success or abandonment).
    fn clear(&self, tool_call_id: &str);
}
