//! Application use cases
//!
//! The per-tool-call composition of registry, tracker, and formatter that an
//! agent orchestrator drives on every model tool-call.

pub mod review_tool_call;

pub use review_tool_call::{ReviewToolCallUseCase, ToolCallDecision};
