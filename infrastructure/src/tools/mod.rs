//! Tool registry infrastructure
//!
//! Concrete registry composing the schema compiler adapter: compile-once
//! registration, byte-identical idempotence, and untrusted-argument
//! validation for every model tool-call.

pub mod registry;

pub use registry::ToolSchemaRegistry;
