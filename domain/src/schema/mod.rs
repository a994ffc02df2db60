//! Schema transformation domain module
//!
//! Result and fault types for preparing a tool schema for guided decoding.
//! The transformer itself (ref resolution, limit enforcement) lives in the
//! infrastructure layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Preflight report for a schema about to be transformed.
///
/// Produced by the non-mutating `validate` pass: structural errors make the
/// schema unusable, warnings flag constructs that transformation will
/// rewrite (e.g. `$ref` inlining).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    /// Nesting depth measured along `properties`/`items`.
    pub depth: usize,
    /// Canonical (compact) serialization size.
    pub size_bytes: usize,
}

/// Faults of the guided-decoding schema transformer.
///
/// All of these are data faults local to one request: the request fails,
/// the process does not.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransformError {
    #[error("Schema exceeds size limit ({actual} > {limit} bytes)")]
    TooLarge { actual: usize, limit: usize },

    #[error("Schema exceeds depth limit ({actual} > {limit} levels) at path: {deepest_path}")]
    TooDeep {
        actual: usize,
        limit: usize,
        deepest_path: String,
    },

    #[error("Only local $ref targets are supported: {0}")]
    ExternalRef(String),

    #[error("Circular $ref detected: {0}")]
    CircularRef(String),

    #[error("Cannot resolve $ref: {0}")]
    UnresolvableRef(String),

    #[error("Schema processing exceeded the {budget_ms}ms budget")]
    Timeout { budget_ms: u64 },
}
