//! Retry tracker — per-tool-call attempt counting and error history
//!
//! Synchronization is scoped per call id: the shared map is only locked to
//! fetch or insert an entry's `Arc`, and all history mutation happens under
//! that entry's own mutex. Unrelated concurrent tool calls never contend.
//!
//! Entries live until [`clear`](RetryTracker::clear) removes them (on
//! success or abandonment); the tracker never auto-expires history.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use argos_application::config::RetryConfig;
use argos_application::ports::retry_tracker::RetryTrackerPort;
use argos_domain::{ValidationAttempt, ValidationError};

#[derive(Default)]
struct CallHistory {
    count: u32,
    attempts: Vec<ValidationAttempt>,
}

/// Thread-safe attempt tracker keyed by tool-call id.
pub struct RetryTracker {
    max_attempts: u32,
    track_history: bool,
    entries: RwLock<HashMap<String, Arc<Mutex<CallHistory>>>>,
}

impl RetryTracker {
    pub fn new(config: &RetryConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            track_history: config.track_history,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Entry for an id, creating it on first use.
    fn entry(&self, tool_call_id: &str) -> Arc<Mutex<CallHistory>> {
        if let Some(entry) = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tool_call_id)
        {
            return Arc::clone(entry);
        }

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            entries
                .entry(tool_call_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(CallHistory::default()))),
        )
    }

    fn existing(&self, tool_call_id: &str) -> Option<Arc<Mutex<CallHistory>>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(tool_call_id)
            .cloned()
    }
}

impl RetryTrackerPort for RetryTracker {
    fn record_attempt(&self, tool_call_id: &str, errors: Vec<ValidationError>) -> u32 {
        let entry = self.entry(tool_call_id);
        let mut history = entry.lock().unwrap_or_else(PoisonError::into_inner);

        history.count += 1;
        let attempt_number = history.count;
        if self.track_history {
            history
                .attempts
                .push(ValidationAttempt::new(attempt_number, errors));
        }

        attempt_number
    }

    fn attempt_count(&self, tool_call_id: &str) -> u32 {
        match self.existing(tool_call_id) {
            Some(entry) => entry.lock().unwrap_or_else(PoisonError::into_inner).count,
            None => 0,
        }
    }

    fn history(&self, tool_call_id: &str) -> Vec<ValidationAttempt> {
        match self.existing(tool_call_id) {
            Some(entry) => entry
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .attempts
                .clone(),
            None => Vec::new(),
        }
    }

    fn has_exceeded_max_retries(&self, tool_call_id: &str) -> bool {
        // Strictly greater-than: the configured maximum is itself a
        // permitted attempt. Formatted messages and escalation triggers
        // depend on this boundary.
        self.attempt_count(tool_call_id) > self.max_attempts
    }

    fn clear(&self, tool_call_id: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(tool_call_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use argos_domain::ViolationKind;

    fn tracker() -> RetryTracker {
        RetryTracker::new(&RetryConfig::default())
    }

    fn error() -> ValidationError {
        ValidationError::violation(ViolationKind::RequiredMissing, "/content")
    }

    #[test]
    fn attempt_numbers_are_monotonic_per_id() {
        let tracker = tracker();

        assert_eq!(tracker.record_attempt("call-1", vec![error()]), 1);
        assert_eq!(tracker.record_attempt("call-1", vec![error()]), 2);
        assert_eq!(tracker.record_attempt("call-1", vec![error()]), 3);
    }

    #[test]
    fn exceeded_is_strictly_greater_than_max() {
        let tracker = tracker(); // max_attempts = 3

        for _ in 0..3 {
            tracker.record_attempt("call-1", vec![error()]);
        }
        assert!(!tracker.has_exceeded_max_retries("call-1"));

        tracker.record_attempt("call-1", vec![error()]);
        assert!(tracker.has_exceeded_max_retries("call-1"));
    }

    #[test]
    fn ids_are_tracked_independently() {
        let tracker = tracker();

        tracker.record_attempt("call-1", vec![error()]);
        tracker.record_attempt("call-1", vec![error()]);
        tracker.record_attempt("call-2", vec![error()]);

        assert_eq!(tracker.attempt_count("call-1"), 2);
        assert_eq!(tracker.attempt_count("call-2"), 1);
    }

    #[test]
    fn unknown_id_has_zero_attempts() {
        let tracker = tracker();

        assert_eq!(tracker.attempt_count("never-seen"), 0);
        assert!(tracker.history("never-seen").is_empty());
        assert!(!tracker.has_exceeded_max_retries("never-seen"));
    }

    #[test]
    fn history_is_an_ordered_snapshot() {
        let tracker = tracker();
        tracker.record_attempt("call-1", vec![error()]);
        tracker.record_attempt("call-1", vec![error(), error()]);

        let history = tracker.history("call-1");

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].attempt_number, 1);
        assert_eq!(history[0].errors.len(), 1);
        assert_eq!(history[1].attempt_number, 2);
        assert_eq!(history[1].errors.len(), 2);
    }

    #[test]
    fn history_returns_independent_copies() {
        let tracker = tracker();
        tracker.record_attempt("call-1", vec![error()]);

        let mut first = tracker.history("call-1");
        first.clear();

        assert_eq!(tracker.history("call-1").len(), 1);
    }

    #[test]
    fn clear_removes_all_state_for_the_id() {
        let tracker = tracker();
        tracker.record_attempt("call-1", vec![error()]);
        tracker.record_attempt("call-2", vec![error()]);

        tracker.clear("call-1");

        assert_eq!(tracker.attempt_count("call-1"), 0);
        assert!(tracker.history("call-1").is_empty());
        assert_eq!(tracker.attempt_count("call-2"), 1);
    }

    #[test]
    fn history_toggle_keeps_counts_but_not_errors() {
        let config = RetryConfig::default().with_history(false);
        let tracker = RetryTracker::new(&config);

        tracker.record_attempt("call-1", vec![error()]);
        tracker.record_attempt("call-1", vec![error()]);

        assert_eq!(tracker.attempt_count("call-1"), 2);
        assert!(tracker.history("call-1").is_empty());
    }

    #[test]
    fn concurrent_increments_on_one_id_are_all_counted() {
        let config = RetryConfig::default().with_max_attempts(10);
        let tracker = Arc::new(RetryTracker::new(&config));
        let threads = 8;
        let per_thread = 50;

        std::thread::scope(|scope| {
            for _ in 0..threads {
                let tracker = Arc::clone(&tracker);
                scope.spawn(move || {
                    for _ in 0..per_thread {
                        tracker.record_attempt("shared-call", Vec::new());
                    }
                });
            }
        });

        assert_eq!(tracker.attempt_count("shared-call"), threads * per_thread);
    }

    #[test]
    fn concurrent_ids_do_not_interfere() {
        let tracker = Arc::new(tracker());

        std::thread::scope(|scope| {
            for i in 0..8 {
                let tracker = Arc::clone(&tracker);
                scope.spawn(move || {
                    let id = format!("call-{}", i);
                    tracker.record_attempt(&id, Vec::new());
                    tracker.record_attempt(&id, Vec::new());
                });
            }
        });

        for i in 0..8 {
            assert_eq!(tracker.attempt_count(&format!("call-{}", i)), 2);
        }
    }
}
