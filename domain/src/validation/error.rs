//! Validation error taxonomy — immutable violation records
//!
//! [`ViolationKind`] is the closed set of schema violations the engine can
//! report, each with a fixed `VAL-NNN` code. The codes are wire-stable:
//! external consumers match on the literal strings.
//!
//! | Kind | Code |
//! |------|------|
//! | `RequiredMissing` | VAL-001 |
//! | `TypeMismatch` | VAL-002 |
//! | `Constraint` | VAL-003 |
//! | `InvalidJson` | VAL-004 |
//! | `UnknownField` | VAL-005 |
//! | `ArrayLength` | VAL-006 |
//! | `PatternMismatch` | VAL-007 |
//! | `NotInEnum` | VAL-008 |
//! | `StringLength` | VAL-009 |
//! | `Format` | VAL-010 |
//! | `NumberRange` | VAL-011 |
//! | `Uniqueness` | VAL-012 |
//! | `Dependency` | VAL-013 |
//! | `MutuallyExclusive` | VAL-014 |
//! | `SchemaShape` | VAL-015 |

use serde::{Deserialize, Serialize};

/// Severity of a validation error.
///
/// Ordinal ordering: `Info` (0) < `Warning` (1) < `Error` (2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Kind of schema violation found in model-emitted arguments.
///
/// This is a closed sum type: the exhaustive [`code`](Self::code) mapping
/// keeps the taxonomy a compile-time-checked contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A required property is missing from the payload.
    RequiredMissing,
    /// A value has the wrong JSON type.
    TypeMismatch,
    /// A generic constraint was violated (catch-all for keywords without a
    /// dedicated kind, e.g. `contains`, `minProperties`).
    Constraint,
    /// The payload is not syntactically valid JSON.
    InvalidJson,
    /// A property not declared in the schema was supplied (strict mode).
    UnknownField,
    /// Array length is outside `minItems`/`maxItems`.
    ArrayLength,
    /// A string does not match its `pattern`.
    PatternMismatch,
    /// A value is not a member of its `enum`.
    NotInEnum,
    /// String length is outside `minLength`/`maxLength`.
    StringLength,
    /// A `format` annotation (date, uri, ...) was violated.
    Format,
    /// A number is outside its `minimum`/`maximum` bounds.
    NumberRange,
    /// Array items are not unique (`uniqueItems`).
    Uniqueness,
    /// A dependency between properties was violated (`dependentRequired`).
    Dependency,
    /// Mutually-exclusive properties were both set (`oneOf` matched twice).
    MutuallyExclusive,
    /// The object does not match the overall schema shape (`oneOf`/`anyOf`/
    /// `not` failed).
    SchemaShape,
}

impl ViolationKind {
    /// Wire-stable error code for this violation kind.
    pub fn code(&self) -> &'static str {
        match self {
            ViolationKind::RequiredMissing => "VAL-001",
            ViolationKind::TypeMismatch => "VAL-002",
            ViolationKind::Constraint => "VAL-003",
            ViolationKind::InvalidJson => "VAL-004",
            ViolationKind::UnknownField => "VAL-005",
            ViolationKind::ArrayLength => "VAL-006",
            ViolationKind::PatternMismatch => "VAL-007",
            ViolationKind::NotInEnum => "VAL-008",
            ViolationKind::StringLength => "VAL-009",
            ViolationKind::Format => "VAL-010",
            ViolationKind::NumberRange => "VAL-011",
            ViolationKind::Uniqueness => "VAL-012",
            ViolationKind::Dependency => "VAL-013",
            ViolationKind::MutuallyExclusive => "VAL-014",
            ViolationKind::SchemaShape => "VAL-015",
        }
    }

    /// Deterministic message template for this kind, keyed by the offending
    /// property name (the last segment of the field path).
    pub fn message_for(&self, field: &str) -> String {
        let field = if field.is_empty() { "payload" } else { field };
        match self {
            ViolationKind::RequiredMissing => {
                format!("Required property '{}' is missing.", field)
            }
            ViolationKind::TypeMismatch => {
                format!("Property '{}' has the wrong type.", field)
            }
            ViolationKind::Constraint => {
                format!("Property '{}' violates a schema constraint.", field)
            }
            ViolationKind::InvalidJson => {
                format!("The {} is not valid JSON.", field)
            }
            ViolationKind::UnknownField => {
                format!("Property '{}' is not declared in the schema.", field)
            }
            ViolationKind::ArrayLength => {
                format!("Array '{}' has an out-of-bounds number of items.", field)
            }
            ViolationKind::PatternMismatch => {
                format!("Property '{}' does not match the required pattern.", field)
            }
            ViolationKind::NotInEnum => {
                format!("Property '{}' is not one of the allowed values.", field)
            }
            ViolationKind::StringLength => {
                format!("Property '{}' has an out-of-bounds length.", field)
            }
            ViolationKind::Format => {
                format!("Property '{}' does not satisfy its format.", field)
            }
            ViolationKind::NumberRange => {
                format!("Property '{}' is outside the allowed range.", field)
            }
            ViolationKind::Uniqueness => {
                format!("Array '{}' contains duplicate items.", field)
            }
            ViolationKind::Dependency => {
                format!("Property '{}' is required by another property.", field)
            }
            ViolationKind::MutuallyExclusive => {
                format!("Property '{}' conflicts with another supplied property.", field)
            }
            ViolationKind::SchemaShape => {
                format!("Object at '{}' does not match the expected schema shape.", field)
            }
        }
    }
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A single schema violation, immutable once constructed.
///
/// `field_path` is an RFC 6901 JSON Pointer (`/a/b/0`). The empty pointer
/// refers to the whole payload. `expected` and `actual` are optional display
/// previews; the actual value is sanitized by the formatter before it reaches
/// a model or a human.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationError {
    pub kind: ViolationKind,
    pub field_path: String,
    pub message: String,
    pub severity: Severity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl ValidationError {
    pub fn new(
        kind: ViolationKind,
        field_path: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            kind,
            field_path: field_path.into(),
            message: message.into(),
            severity,
            expected: None,
            actual: None,
        }
    }

    /// Construct an error-severity violation using the kind's message template.
    pub fn violation(kind: ViolationKind, field_path: impl Into<String>) -> Self {
        let field_path = field_path.into();
        let message = kind.message_for(field_name(&field_path));
        Self::new(kind, field_path, message, Severity::Error)
    }

    pub fn with_expected(mut self, expected: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self
    }

    pub fn with_actual(mut self, actual: impl Into<String>) -> Self {
        self.actual = Some(actual.into());
        self
    }

    /// Wire-stable code of this error's violation kind.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// The offending property name (last pointer segment).
    pub fn field_name(&self) -> &str {
        field_name(&self.field_path)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] {} at {}: {}",
            self.severity,
            self.code(),
            if self.field_path.is_empty() { "/" } else { &self.field_path },
            self.message
        )
    }
}

/// Last segment of a JSON Pointer, with RFC 6901 escapes decoded.
pub fn field_name(pointer: &str) -> &str {
    match pointer.rfind('/') {
        Some(idx) => &pointer[idx + 1..],
        None => pointer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering_is_ordinal() {
        assert!(Severity::Info < Severity::Warning);
        assert!(Severity::Warning < Severity::Error);
    }

    #[test]
    fn every_kind_has_a_distinct_code() {
        let kinds = [
            ViolationKind::RequiredMissing,
            ViolationKind::TypeMismatch,
            ViolationKind::Constraint,
            ViolationKind::InvalidJson,
            ViolationKind::UnknownField,
            ViolationKind::ArrayLength,
            ViolationKind::PatternMismatch,
            ViolationKind::NotInEnum,
            ViolationKind::StringLength,
            ViolationKind::Format,
            ViolationKind::NumberRange,
            ViolationKind::Uniqueness,
            ViolationKind::Dependency,
            ViolationKind::MutuallyExclusive,
            ViolationKind::SchemaShape,
        ];

        let codes: std::collections::HashSet<&str> = kinds.iter().map(|k| k.code()).collect();
        assert_eq!(codes.len(), 15);
        for code in codes {
            assert!(code.starts_with("VAL-"));
            assert_eq!(code.len(), 7);
        }
    }

    #[test]
    fn code_table_is_stable() {
        assert_eq!(ViolationKind::RequiredMissing.code(), "VAL-001");
        assert_eq!(ViolationKind::TypeMismatch.code(), "VAL-002");
        assert_eq!(ViolationKind::InvalidJson.code(), "VAL-004");
        assert_eq!(ViolationKind::UnknownField.code(), "VAL-005");
        assert_eq!(ViolationKind::NotInEnum.code(), "VAL-008");
        assert_eq!(ViolationKind::SchemaShape.code(), "VAL-015");
    }

    #[test]
    fn violation_constructor_uses_template() {
        let error = ValidationError::violation(ViolationKind::RequiredMissing, "/content");

        assert_eq!(error.code(), "VAL-001");
        assert_eq!(error.field_path, "/content");
        assert_eq!(error.severity, Severity::Error);
        assert!(error.message.contains("'content'"));
        assert!(error.expected.is_none());
        assert!(error.actual.is_none());
    }

    #[test]
    fn builder_attaches_previews() {
        let error = ValidationError::violation(ViolationKind::TypeMismatch, "/count")
            .with_expected("integer")
            .with_actual("\"three\"");

        assert_eq!(error.expected.as_deref(), Some("integer"));
        assert_eq!(error.actual.as_deref(), Some("\"three\""));
    }

    #[test]
    fn display_includes_severity_code_and_path() {
        let error = ValidationError::violation(ViolationKind::PatternMismatch, "/name");
        let rendered = error.to_string();

        assert!(rendered.starts_with("[error] VAL-007 at /name:"));
    }

    #[test]
    fn field_name_takes_last_pointer_segment() {
        assert_eq!(field_name("/a/b/0"), "0");
        assert_eq!(field_name("/content"), "content");
        assert_eq!(field_name(""), "");
    }
}
