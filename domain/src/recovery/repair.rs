//! Repair result — outcome of heuristic JSON repair

use serde::{Deserialize, Serialize};

/// Outcome of attempting to repair malformed model JSON.
///
/// Invariant: when `success` is true, `repaired_json` holds syntactically
/// valid JSON (identical to the input when `was_repaired` is false). The
/// constructors are the only way to build one, so the invariant cannot be
/// bypassed by partial initialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepairResult {
    /// The input text as received.
    pub original_json: String,
    /// Valid JSON produced by the repair, when successful.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repaired_json: Option<String>,
    /// Whether valid JSON was obtained.
    pub success: bool,
    /// Whether any repair was actually applied.
    pub was_repaired: bool,
    /// Names of the repairs applied, in application order.
    pub repairs_applied: Vec<String>,
    /// Diagnostic for a failed repair.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RepairResult {
    /// The input was already valid JSON; nothing was changed.
    pub fn already_valid(json: impl Into<String>) -> Self {
        let json = json.into();
        Self {
            original_json: json.clone(),
            repaired_json: Some(json),
            success: true,
            was_repaired: false,
            repairs_applied: Vec::new(),
            error: None,
        }
    }

    /// Repairs were applied and produced valid JSON.
    pub fn repaired(
        original: impl Into<String>,
        repaired: impl Into<String>,
        repairs_applied: Vec<String>,
    ) -> Self {
        Self {
            original_json: original.into(),
            repaired_json: Some(repaired.into()),
            success: true,
            was_repaired: true,
            repairs_applied,
            error: None,
        }
    }

    /// No combination of repairs produced valid JSON.
    pub fn failed(original: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            original_json: original.into(),
            repaired_json: None,
            success: false,
            was_repaired: false,
            repairs_applied: Vec::new(),
            error: Some(error.into()),
        }
    }
}
