//! Fallback handling for invalid guided-decoding output
//!
//! A shallow decision procedure, not a state machine: all recovery state
//! lives in the caller's [`FallbackContext`]. Each call makes exactly one
//! decision — give up on an exhausted budget, recover by extraction, ask
//! the caller to regenerate, or declare the output unrecoverable.

use std::sync::Arc;

use argos_application::ports::schema_compiler::SchemaCompilerPort;
use argos_domain::{FallbackContext, FallbackResult};
use serde_json::Value;

use super::extract::extract_json;

/// Orchestrates post-generation recovery: extract, regenerate, or give up.
pub struct FallbackHandler {
    compiler: Arc<dyn SchemaCompilerPort>,
}

impl FallbackHandler {
    pub fn new(compiler: Arc<dyn SchemaCompilerPort>) -> Self {
        Self { compiler }
    }

    /// Decide the next recovery step for one invalid generation.
    ///
    /// An exhausted budget is checked before anything else and does not
    /// consume a further attempt.
    pub fn handle(&self, context: &mut FallbackContext, schema: &Value) -> FallbackResult {
        if context.fallback_attempts >= context.max_fallback_attempts {
            tracing::warn!(
                model = %context.model_id,
                attempts = context.fallback_attempts,
                "Fallback attempts exhausted"
            );
            return FallbackResult::max_attempts_exceeded(
                context.fallback_attempts,
                context.max_fallback_attempts,
            );
        }

        context.fallback_attempts += 1;

        if let Some(invalid_output) = context.invalid_output.as_deref() {
            if let Some(extracted) = extract_json(invalid_output) {
                match self.compiler.compile(schema) {
                    Ok(compiled) => {
                        if let Ok(value) = serde_json::from_str::<Value>(&extracted) {
                            if compiled.is_valid(&value) {
                                tracing::debug!(
                                    model = %context.model_id,
                                    attempt = context.fallback_attempts,
                                    "Recovered output by extraction"
                                );
                                return FallbackResult::extraction_succeeded(extracted);
                            }
                        }
                    }
                    Err(err) => {
                        return FallbackResult::unrecoverable(format!(
                            "Schema failed to compile during fallback: {}",
                            err
                        ));
                    }
                }
            }
        }

        if context.should_regenerate_output {
            tracing::debug!(
                model = %context.model_id,
                attempt = context.fallback_attempts,
                "Requesting regeneration"
            );
            return FallbackResult::regeneration_required(format!(
                "Output did not match the schema; regenerate with model '{}'",
                context.model_id
            ));
        }

        FallbackResult::unrecoverable("No recovery path available for the invalid output")
    }

    /// Convenience wrapper: does `output` parse and satisfy `schema`?
    pub fn validate(&self, output: &str, schema: &Value) -> bool {
        let Ok(value) = serde_json::from_str::<Value>(output) else {
            return false;
        };
        match self.compiler.compile(schema) {
            Ok(compiled) => compiled.is_valid(&value),
            Err(_) => false,
        }
    }
}
