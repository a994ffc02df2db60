//! Infrastructure layer for argos
//!
//! Concrete implementations of the application ports:
//!
//! - [`schema`] — JSON Schema engine adapter (compile-once / validate-many)
//! - [`tools`] — thread-safe tool schema registry
//! - [`retry`] — attempt tracking, aggregation, sanitization, formatting
//! - [`structured`] — extraction, repair, transformation, fallback
//! - [`config`] — TOML/env configuration loading
//!
//! All operations are synchronous and CPU-bound; nothing here performs I/O
//! except the config loader.

pub mod config;
pub mod retry;
pub mod schema;
pub mod structured;
pub mod tools;

// Re-export the concrete components
pub use config::{ConfigLoader, FileConfig};
pub use retry::{ErrorAggregator, ErrorFormatter, RetryTracker, ValueSanitizer};
pub use schema::JsonSchemaCompiler;
pub use structured::{extract_json, FallbackHandler, JsonRepairer, SchemaTransformer};
pub use tools::ToolSchemaRegistry;
