//! Application ports
//!
//! Traits at the seams between the use cases and the infrastructure layer.
//! Each port is narrow: implementations may swap freely (e.g. a different
//! JSON Schema engine behind [`schema_compiler::SchemaCompilerPort`]) without
//! touching the rest of the core.

pub mod feedback;
pub mod retry_tracker;
pub mod schema_compiler;
pub mod tool_registry;

pub use feedback::FeedbackFormatterPort;
pub use retry_tracker::RetryTrackerPort;
pub use schema_compiler::{CompiledSchema, SchemaCompileError, SchemaCompilerPort};
pub use tool_registry::ToolRegistryPort;
