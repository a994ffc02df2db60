//! Structured output infrastructure
//!
//! Everything that runs after a model emits guided-decoding output, or
//! before a request is sent with a schema attached:
//!
//! - [`extract`] — pull a balanced JSON span out of surrounding prose
//! - [`repair`] — fix the syntax mistakes models actually make
//! - [`transformer`] — inline `$ref`s and enforce depth/size/time budgets
//! - [`fallback`] — decide between extraction, regeneration, and giving up

pub mod extract;
pub mod fallback;
pub mod repair;
pub mod transformer;

pub use extract::extract_json;
pub use fallback::FallbackHandler;
pub use repair::JsonRepairer;
pub use transformer::SchemaTransformer;
