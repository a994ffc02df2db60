//! Tool definition entity and registry faults

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Definition of a tool the model may call.
///
/// Immutable once registered; lives for the process lifetime. Re-registering
/// the same name is accepted only when the parameter schema text is identical
/// byte-for-byte (cosmetic differences count as conflicts).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g. "write_file")
    pub name: String,
    /// Human-readable description
    pub description: String,
    /// JSON Schema document describing the tool's arguments
    pub parameters: Value,
}

impl ToolDefinition {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Canonical schema text used for the registration-equality check.
    ///
    /// Equality is byte-for-byte on this compact serialization, not semantic
    /// JSON equality: two schemas that differ only in key order are treated
    /// as conflicting definitions.
    pub fn schema_text(&self) -> String {
        self.parameters.to_string()
    }
}

/// Configuration-time faults of the tool schema registry.
///
/// These indicate a programming or deployment error, not a transient model
/// mistake, and are raised synchronously to the caller rather than fed to
/// the retry path.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Tool '{0}' is not registered")]
    UnknownTool(String),

    #[error("Tool '{0}' is already registered with a different definition")]
    ConflictingDefinition(String),

    #[error("Invalid parameter schema for tool '{name}': {reason}")]
    InvalidSchema { name: String, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new(
            "write_file",
            "Write content to a file",
            json!({
                "type": "object",
                "properties": {
                    "path": {"type": "string"},
                    "content": {"type": "string"},
                },
                "required": ["path", "content"],
            }),
        );

        assert_eq!(tool.name, "write_file");
        assert_eq!(tool.parameters["required"][0], "path");
    }

    #[test]
    fn schema_text_is_key_order_sensitive() {
        let a = ToolDefinition::new("t", "", json!({"type": "object"}));
        let b = ToolDefinition::new("t", "", json!({"type": "object"}));
        assert_eq!(a.schema_text(), b.schema_text());

        // serde_json preserves insertion order, so a different key order
        // produces different canonical text.
        let c: Value =
            serde_json::from_str(r#"{"properties":{},"type":"object"}"#).unwrap();
        let d: Value =
            serde_json::from_str(r#"{"type":"object","properties":{}}"#).unwrap();
        assert_ne!(
            ToolDefinition::new("t", "", c).schema_text(),
            ToolDefinition::new("t", "", d).schema_text()
        );
    }

    #[test]
    fn registry_error_display() {
        let err = RegistryError::UnknownTool("read_file".to_string());
        assert_eq!(err.to_string(), "Tool 'read_file' is not registered");
    }
}
