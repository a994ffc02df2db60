//! Tool Schema Registry
//!
//! The [`ToolSchemaRegistry`] owns every registered [`ToolDefinition`] and
//! its compiled parameter schema, and implements [`ToolRegistryPort`].
//!
//! # Registration semantics
//!
//! - Compilation happens exactly once per tool name; the compiled form is
//!   reused for every subsequent validation.
//! - Re-registering a name is idempotent only when the canonical schema text
//!   is byte-identical. Cosmetically different schemas are conflicts: the
//!   comparison is deliberately textual, not semantic.
//! - First-registration races are resolved with a double-checked
//!   compile-and-insert: compilation runs outside the write lock, and losers
//!   re-check under the lock so two different compiled schemas can never
//!   silently coexist.
//!
//! # Validation semantics
//!
//! Argument text arrives straight from the model and is untrusted. A syntax
//! error is an ordinary data outcome (`VAL-004` at the payload root), not a
//! fault; only an unregistered tool name faults.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use argos_application::ports::schema_compiler::{CompiledSchema, SchemaCompilerPort};
use argos_application::ports::tool_registry::ToolRegistryPort;
use argos_domain::{
    RegistryError, ToolDefinition, ValidationError, ValidationOutcome, ViolationKind,
};
use serde_json::Value;

/// Longest raw-text preview attached to a syntax error.
const MAX_SYNTAX_PREVIEW: usize = 120;

/// A registered tool with its precompiled schema.
struct RegisteredTool {
    definition: ToolDefinition,
    schema_text: String,
    compiled: Arc<dyn CompiledSchema>,
}

/// Thread-safe registry of tool definitions with compiled-schema caching.
pub struct ToolSchemaRegistry {
    compiler: Arc<dyn SchemaCompilerPort>,
    tools: RwLock<HashMap<String, Arc<RegisteredTool>>>,
}

impl ToolSchemaRegistry {
    pub fn new(compiler: Arc<dyn SchemaCompilerPort>) -> Self {
        Self {
            compiler,
            tools: RwLock::new(HashMap::new()),
        }
    }

    /// Number of registered tools.
    pub fn len(&self) -> usize {
        self.read_tools().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read_tools().is_empty()
    }

    /// Clone of a registered definition, if any.
    pub fn definition(&self, tool_name: &str) -> Option<ToolDefinition> {
        self.read_tools()
            .get(tool_name)
            .map(|tool| tool.definition.clone())
    }

    fn read_tools(&self) -> std::sync::RwLockReadGuard<'_, HashMap<String, Arc<RegisteredTool>>> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, tool_name: &str) -> Option<Arc<RegisteredTool>> {
        self.read_tools().get(tool_name).cloned()
    }
}

impl ToolRegistryPort for ToolSchemaRegistry {
    fn register_tool(&self, definition: ToolDefinition) -> Result<(), RegistryError> {
        let schema_text = definition.schema_text();

        // Fast path: an existing entry settles idempotence vs conflict
        // without compiling anything.
        if let Some(existing) = self.lookup(&definition.name) {
            if existing.schema_text == schema_text {
                tracing::debug!(
                    tool = %definition.name,
                    "Tool already registered with identical definition"
                );
                return Ok(());
            }
            return Err(RegistryError::ConflictingDefinition(definition.name));
        }

        // Compile outside the write lock; a malformed schema is a
        // configuration fault, not a retryable outcome.
        let compiled = self
            .compiler
            .compile(&definition.parameters)
            .map_err(|err| RegistryError::InvalidSchema {
                name: definition.name.clone(),
                reason: err.to_string(),
            })?;

        let mut tools = self.tools.write().unwrap_or_else(PoisonError::into_inner);

        // Double-check: a racing registration may have won while we compiled.
        if let Some(existing) = tools.get(&definition.name) {
            if existing.schema_text == schema_text {
                tracing::debug!(
                    tool = %definition.name,
                    "Lost registration race to an identical definition"
                );
                return Ok(());
            }
            return Err(RegistryError::ConflictingDefinition(definition.name));
        }

        tracing::info!(tool = %definition.name, "Registered tool");
        tools.insert(
            definition.name.clone(),
            Arc::new(RegisteredTool {
                schema_text,
                compiled,
                definition,
            }),
        );

        Ok(())
    }

    fn validate_arguments(
        &self,
        tool_name: &str,
        arguments_json: &str,
    ) -> Result<ValidationOutcome, RegistryError> {
        let tool = self
            .lookup(tool_name)
            .ok_or_else(|| RegistryError::UnknownTool(tool_name.to_string()))?;

        let payload: Value = match serde_json::from_str(arguments_json) {
            Ok(value) => value,
            Err(err) => {
                tracing::debug!(tool = tool_name, error = %err, "Arguments are not valid JSON");
                let error = ValidationError::violation(ViolationKind::InvalidJson, "")
                    .with_actual(syntax_preview(arguments_json));
                return Ok(ValidationOutcome::Invalid(vec![error]));
            }
        };

        let errors = tool.compiled.validate(&payload);
        if errors.is_empty() {
            Ok(ValidationOutcome::Valid(payload))
        } else {
            tracing::debug!(
                tool = tool_name,
                errors = errors.len(),
                "Arguments failed schema validation"
            );
            Ok(ValidationOutcome::Invalid(errors))
        }
    }

    fn is_registered(&self, tool_name: &str) -> bool {
        self.read_tools().contains_key(tool_name)
    }

    fn tool_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read_tools().keys().cloned().collect();
        names.sort();
        names
    }
}

fn syntax_preview(text: &str) -> String {
    let mut preview: String = text.chars().take(MAX_SYNTAX_PREVIEW).collect();
    if text.chars().count() > MAX_SYNTAX_PREVIEW {
        preview.push_str("...");
    }
    preview
}
