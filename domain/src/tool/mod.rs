//! Tool domain module
//!
//! A [`ToolDefinition`] pairs a tool name with the JSON Schema its arguments
//! must satisfy. Definitions are registered once at startup and consulted on
//! every model tool-call; the registry implementation lives in the
//! infrastructure layer, this module only owns the entity and its
//! configuration-time faults.

pub mod definition;

pub use definition::{RegistryError, ToolDefinition};
