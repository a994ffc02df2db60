//! JSON Schema engine adapters
//!
//! The compile-once / validate-many implementation of the application's
//! schema compiler port, backed by the `jsonschema` crate.

pub mod compiler;

pub use compiler::{CompiledJsonSchema, JsonSchemaCompiler};
