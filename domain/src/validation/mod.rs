//! Validation domain module
//!
//! Defines the **error taxonomy** side of the tool-call pipeline: how a
//! schema violation found in model-emitted arguments is classified, recorded,
//! and carried through the retry/escalation flow.
//!
//! # Key Types
//!
//! - [`ViolationKind`] — closed enum of the fifteen violation kinds
//! - [`ValidationError`] — immutable record of a single violation
//! - [`ValidationAttempt`] — snapshot of one failed validation pass
//! - [`ValidationOutcome`] — valid payload or ordered error list
//!
//! The `VAL-NNN` codes carried by [`ValidationError`] are a public contract:
//! consumers (logging, UI, tests) match on the literal strings, so the
//! kind-to-code mapping must never be reordered or renumbered.

pub mod attempt;
pub mod error;
pub mod outcome;

pub use attempt::ValidationAttempt;
pub use error::{Severity, ValidationError, ViolationKind};
pub use outcome::ValidationOutcome;
