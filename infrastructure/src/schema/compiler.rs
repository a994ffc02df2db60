//! JSON Schema engine adapter.
//!
//! Default implementation of [`SchemaCompilerPort`] backed by the
//! `jsonschema` crate. Compilation happens once per tool at registration;
//! validation walks the compiled form and maps every engine violation onto
//! the closed [`ViolationKind`] taxonomy, so nothing outside this file ever
//! sees the engine's own error types.
//!
//! Mapping notes:
//! - `required` violations report the pointer of the *missing member*
//!   (instance path + property name), not the containing object.
//! - `additionalProperties` violations fan out to one error per unexpected
//!   member so each gets its own pointer.
//! - `dependentRequired`/`dependencies` failures surface as `required` from
//!   the engine; the schema location of the failing keyword tells them apart.

use std::sync::Arc;

use argos_application::ports::schema_compiler::{
    CompiledSchema, SchemaCompileError, SchemaCompilerPort,
};
use argos_domain::{ValidationError, ViolationKind};
use jsonschema::error::ValidationErrorKind;
use jsonschema::Validator;
use serde_json::Value;

/// Longest stored actual-value preview; the formatter applies the
/// configured preview length on top of this cap.
const MAX_STORED_PREVIEW: usize = 256;

/// Schema compiler backed by the `jsonschema` crate.
#[derive(Debug, Clone, Default)]
pub struct JsonSchemaCompiler;

impl JsonSchemaCompiler {
    pub fn new() -> Self {
        Self
    }
}

impl SchemaCompilerPort for JsonSchemaCompiler {
    fn compile(&self, schema: &Value) -> Result<Arc<dyn CompiledSchema>, SchemaCompileError> {
        let validator = jsonschema::validator_for(schema)
            .map_err(|err| SchemaCompileError(err.to_string()))?;

        Ok(Arc::new(CompiledJsonSchema {
            validator,
            schema: schema.clone(),
        }))
    }
}

/// A schema compiled for repeated validation, plus the source document used
/// to recover expected values for type violations.
pub struct CompiledJsonSchema {
    validator: Validator,
    schema: Value,
}

impl CompiledSchema for CompiledJsonSchema {
    fn validate(&self, instance: &Value) -> Vec<ValidationError> {
        self.validator
            .iter_errors(instance)
            .flat_map(|err| convert_error(&self.schema, &err))
            .collect()
    }

    fn is_valid(&self, instance: &Value) -> bool {
        self.validator.is_valid(instance)
    }
}

/// Convert one engine error into taxonomy errors.
fn convert_error(
    schema: &Value,
    err: &jsonschema::ValidationError<'_>,
) -> Vec<ValidationError> {
    let instance_path = err.instance_path().to_string();
    let schema_path = err.schema_path().to_string();

    // Unknown members fan out to one error per offending property.
    if let ValidationErrorKind::AdditionalProperties { unexpected } = err.kind() {
        return unexpected
            .iter()
            .map(|property| {
                let path = append_pointer(&instance_path, property);
                ValidationError::violation(ViolationKind::UnknownField, path)
            })
            .collect();
    }

    let kind = classify(err.kind(), &schema_path);

    let field_path = match err.kind() {
        ValidationErrorKind::Required { property } => {
            append_pointer(&instance_path, &property_name(property))
        }
        _ => instance_path,
    };

    let mut error = ValidationError::violation(kind, field_path);

    if let Some(expected) = expected_preview(schema, err.kind(), &schema_path) {
        error = error.with_expected(expected);
    }
    if let Some(actual) = actual_preview(err.kind(), err.instance()) {
        error = error.with_actual(actual);
    }

    vec![error]
}

/// Classify an engine violation into the fixed taxonomy.
fn classify(kind: &ValidationErrorKind, schema_path: &str) -> ViolationKind {
    match kind {
        ValidationErrorKind::Required { .. } => {
            // dependentRequired/dependencies failures come back as `required`
            // against the dependency keyword's schema location.
            if schema_path.contains("dependentRequired") || schema_path.contains("dependencies") {
                ViolationKind::Dependency
            } else {
                ViolationKind::RequiredMissing
            }
        }
        ValidationErrorKind::Type { .. } => ViolationKind::TypeMismatch,
        ValidationErrorKind::MinLength { .. } | ValidationErrorKind::MaxLength { .. } => {
            ViolationKind::StringLength
        }
        ValidationErrorKind::Pattern { .. } => ViolationKind::PatternMismatch,
        ValidationErrorKind::Enum { .. } | ValidationErrorKind::Constant { .. } => {
            ViolationKind::NotInEnum
        }
        ValidationErrorKind::Format { .. } => ViolationKind::Format,
        ValidationErrorKind::Minimum { .. }
        | ValidationErrorKind::Maximum { .. }
        | ValidationErrorKind::ExclusiveMinimum { .. }
        | ValidationErrorKind::ExclusiveMaximum { .. }
        | ValidationErrorKind::MultipleOf { .. } => ViolationKind::NumberRange,
        ValidationErrorKind::MinItems { .. } | ValidationErrorKind::MaxItems { .. } => {
            ViolationKind::ArrayLength
        }
        ValidationErrorKind::UniqueItems { .. } => ViolationKind::Uniqueness,
        ValidationErrorKind::AdditionalProperties { .. } => ViolationKind::UnknownField,
        ValidationErrorKind::OneOfMultipleValid { .. } => ViolationKind::MutuallyExclusive,
        ValidationErrorKind::OneOfNotValid { .. }
        | ValidationErrorKind::AnyOf { .. }
        | ValidationErrorKind::Not { .. }
        | ValidationErrorKind::FalseSchema { .. } => ViolationKind::SchemaShape,
        _ => ViolationKind::Constraint,
    }
}

/// Expected-value preview for kinds where the violated keyword pins one down.
fn expected_preview(
    schema: &Value,
    kind: &ValidationErrorKind,
    schema_path: &str,
) -> Option<String> {
    match kind {
        ValidationErrorKind::Enum { options } => Some(options.to_string()),
        ValidationErrorKind::Constant { expected_value } => Some(expected_value.to_string()),
        ValidationErrorKind::Pattern { pattern } => Some(pattern.clone()),
        ValidationErrorKind::Format { format } => Some(format.clone()),
        ValidationErrorKind::MinLength { limit } => Some(format!("length >= {}", limit)),
        ValidationErrorKind::MaxLength { limit } => Some(format!("length <= {}", limit)),
        ValidationErrorKind::Minimum { limit } => Some(format!(">= {}", limit)),
        ValidationErrorKind::Maximum { limit } => Some(format!("<= {}", limit)),
        ValidationErrorKind::ExclusiveMinimum { limit } => Some(format!("> {}", limit)),
        ValidationErrorKind::ExclusiveMaximum { limit } => Some(format!("< {}", limit)),
        ValidationErrorKind::MultipleOf { multiple_of } => {
            Some(format!("multiple of {}", multiple_of))
        }
        ValidationErrorKind::MinItems { limit } => Some(format!("items >= {}", limit)),
        ValidationErrorKind::MaxItems { limit } => Some(format!("items <= {}", limit)),
        // The violated `type` keyword holds the expected type verbatim.
        ValidationErrorKind::Type { .. } => schema
            .pointer(schema_path)
            .map(|keyword| keyword.to_string()),
        _ => None,
    }
}

/// Actual-value preview, capped so huge payloads never end up in history.
fn actual_preview(kind: &ValidationErrorKind, instance: &Value) -> Option<String> {
    match kind {
        // The instance for a missing-member error is the whole object;
        // previewing it would leak sibling values for no diagnostic gain.
        ValidationErrorKind::Required { .. } => None,
        _ => {
            let mut preview = instance.to_string();
            if preview.chars().count() > MAX_STORED_PREVIEW {
                preview = preview.chars().take(MAX_STORED_PREVIEW).collect();
                preview.push_str("...");
            }
            Some(preview)
        }
    }
}

fn property_name(property: &Value) -> String {
    match property.as_str() {
        Some(name) => name.to_string(),
        None => property.to_string(),
    }
}

/// Append a member name to a JSON Pointer with RFC 6901 escaping.
fn append_pointer(pointer: &str, member: &str) -> String {
    format!("{}/{}", pointer, member.replace('~', "~0").replace('/', "~1"))
}
