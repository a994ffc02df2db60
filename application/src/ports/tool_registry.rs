//! Tool registry port
//!
//! Registration and argument validation surface consumed by use cases and
//! the CLI. The concrete registry (compiled-schema cache, concurrency
//! handling) lives in the infrastructure layer.

use argos_domain::{RegistryError, ToolDefinition, ValidationOutcome};

/// Port for the tool schema registry.
pub trait ToolRegistryPort: Send + Sync {
    /// Register a tool definition, compiling its parameter schema.
    ///
    /// Idempotent for byte-identical re-registration; conflicting or
    /// malformed definitions are configuration faults.
    fn register_tool(&self, definition: ToolDefinition) -> Result<(), RegistryError>;

    /// Validate raw model-emitted argument text against a registered tool's
    /// schema. An unknown tool is a configuration fault; invalid arguments
    /// are a data outcome, not an error.
    fn validate_arguments(
        &self,
        tool_name: &str,
        arguments_json: &str,
    ) -> Result<ValidationOutcome, RegistryError>;

    /// Whether a tool of this name has been registered.
    fn is_registered(&self, tool_name: &str) -> bool;

    /// Names of all registered tools.
    fn tool_names(&self) -> Vec<String>;
}
