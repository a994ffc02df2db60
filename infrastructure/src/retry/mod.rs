//! Retry infrastructure
//!
//! The pipeline that turns failed validations into bounded feedback:
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ RetryTracker │───▶│ Aggregator / │───▶│ErrorFormatter│
//! │ (history)    │    │ Sanitizer    │    │ (messages)   │
//! └──────────────┘    └──────────────┘    └──────────────┘
//! ```
//!
//! The tracker counts attempts and keeps history per tool-call id; the
//! formatter renders one attempt into model feedback or a full history into
//! a human escalation report, with the aggregator and sanitizer keeping the
//! output deduplicated, secret-free, and within the message budget.

pub mod aggregator;
pub mod formatter;
pub mod sanitizer;
pub mod tracker;

pub use aggregator::ErrorAggregator;
pub use formatter::ErrorFormatter;
pub use sanitizer::ValueSanitizer;
pub use tracker::RetryTracker;
