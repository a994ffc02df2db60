//! Schema compiler port
//!
//! Narrow compile-once / validate-many capability over a JSON Schema engine.
//! The registry compiles each tool's parameter schema exactly once at
//! registration and validates every subsequent payload against the compiled
//! form; nothing outside the adapter sees the engine's own types.

use std::sync::Arc;

use argos_domain::ValidationError;
use serde_json::Value;
use thiserror::Error;

/// A schema document that failed to compile.
///
/// This is a configuration fault: it is raised at registration time, not fed
/// to the model retry path.
#[derive(Error, Debug, Clone)]
#[error("Not a valid JSON Schema: {0}")]
pub struct SchemaCompileError(pub String);

/// A schema compiled for repeated validation.
///
/// Implementations are immutable and shareable across threads.
pub trait CompiledSchema: Send + Sync {
    /// Validate an instance, returning all violations in engine order.
    fn validate(&self, instance: &Value) -> Vec<ValidationError>;

    /// Fast-path check with no error materialization.
    fn is_valid(&self, instance: &Value) -> bool {
        self.validate(instance).is_empty()
    }
}

/// Port for compiling JSON Schema documents.
pub trait SchemaCompilerPort: Send + Sync {
    /// Compile a schema document for repeated validation.
    fn compile(&self, schema: &Value) -> Result<Arc<dyn CompiledSchema>, SchemaCompileError>;
}
