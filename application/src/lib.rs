//! Application layer for argos
//!
//! Use cases, ports, and configuration for the structured-output validation
//! core. Ports define the seams implemented by the infrastructure layer:
//! schema compilation, the tool registry, retry tracking, and feedback
//! formatting. The use case composes those ports into the per-tool-call
//! control flow an agent orchestrator drives.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export the primary API surface
pub use config::{ConfigError, RetryConfig, TransformLimits};
pub use ports::{
    feedback::FeedbackFormatterPort,
    schema_compiler::{CompiledSchema, SchemaCompileError, SchemaCompilerPort},
    retry_tracker::RetryTrackerPort,
    tool_registry::ToolRegistryPort,
};
pub use use_cases::review_tool_call::{ReviewToolCallUseCase, ToolCallDecision};
