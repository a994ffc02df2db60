//! Schema transformation for guided decoding
//!
//! Guided-decoding backends want a flat, bounded schema: no `$ref`
//! indirection, limited nesting, limited size. [`SchemaTransformer`]
//! enforces the limits in a fixed order — size first, then local `$ref`
//! resolution (external and circular refs rejected, `$defs`/`definitions`
//! containers stripped), then post-resolution depth — the whole pass
//! bounded by a wall-clock budget so a pathological schema fails instead
//! of hanging the request.

use std::collections::HashSet;
use std::time::Instant;

use argos_application::config::TransformLimits;
use argos_domain::{SchemaValidationResult, TransformError};
use serde_json::{Map, Value};

/// Transforms and validates tool schemas for guided decoding.
#[derive(Debug, Clone)]
pub struct SchemaTransformer {
    limits: TransformLimits,
}

impl SchemaTransformer {
    pub fn new(limits: TransformLimits) -> Self {
        Self { limits }
    }

    /// Resolve refs and enforce limits, producing the inlined schema.
    pub fn transform(&self, schema: &Value) -> Result<Value, TransformError> {
        let size = schema.to_string().len();
        if size > self.limits.max_size {
            return Err(TransformError::TooLarge {
                actual: size,
                limit: self.limits.max_size,
            });
        }

        let deadline = Deadline::new(&self.limits);
        let resolved = self.resolve_refs(schema, schema, &HashSet::new(), &deadline)?;

        let (depth, deepest_path) = depth_with_path(&resolved, 0, "");
        if depth > self.limits.max_depth {
            tracing::debug!(depth, path = %deepest_path, "Schema rejected for depth");
            return Err(TransformError::TooDeep {
                actual: depth,
                limit: self.limits.max_depth,
                deepest_path,
            });
        }

        Ok(resolved)
    }

    /// Non-mutating preflight over the same checks.
    ///
    /// Reports size and depth violations as errors and `$ref` usage as a
    /// warning (transformation will inline them), without resolving.
    pub fn validate(&self, schema: &Value) -> SchemaValidationResult {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();

        let size_bytes = schema.to_string().len();
        if size_bytes > self.limits.max_size {
            errors.push(format!(
                "Schema exceeds size limit ({} > {} bytes)",
                size_bytes, self.limits.max_size
            ));
        }

        let (depth, deepest_path) = depth_with_path(schema, 0, "");
        if depth > self.limits.max_depth {
            errors.push(format!(
                "Schema exceeds depth limit ({} > {} levels) at path: {}",
                depth, self.limits.max_depth, deepest_path
            ));
        }

        if contains_ref(schema) {
            warnings.push(
                "Schema contains $ref which will be inlined during transformation".to_string(),
            );
        }

        SchemaValidationResult {
            is_valid: errors.is_empty(),
            errors,
            warnings,
            depth,
            size_bytes,
        }
    }

    /// Recursively inline local `$ref`s.
    ///
    /// `visited` holds the refs followed along the current resolution path;
    /// each `properties`/`items` branch starts from the caller's set, so
    /// diamond-shaped reuse is fine while true cycles are rejected.
    fn resolve_refs(
        &self,
        element: &Value,
        root: &Value,
        visited: &HashSet<String>,
        deadline: &Deadline,
    ) -> Result<Value, TransformError> {
        deadline.check()?;

        let Some(object) = element.as_object() else {
            return Ok(element.clone());
        };

        if let Some(ref_value) = object.get("$ref") {
            let ref_path = match ref_value.as_str() {
                Some(path) => path,
                None => return Err(TransformError::UnresolvableRef(ref_value.to_string())),
            };
            if !ref_path.starts_with("#/") {
                return Err(TransformError::ExternalRef(ref_path.to_string()));
            }
            if visited.contains(ref_path) {
                return Err(TransformError::CircularRef(ref_path.to_string()));
            }

            let target = root
                .pointer(&ref_path[1..])
                .ok_or_else(|| TransformError::UnresolvableRef(ref_path.to_string()))?;

            let mut visited = visited.clone();
            visited.insert(ref_path.to_string());
            return self.resolve_refs(target, root, &visited, deadline);
        }

        let mut out = Map::new();
        for (key, value) in object {
            // Ref containers are fully inlined, so they vanish from the output.
            if key == "$defs" || key == "definitions" {
                continue;
            }

            if key == "properties" {
                if let Some(props) = value.as_object() {
                    let mut resolved_props = Map::new();
                    for (name, prop) in props {
                        resolved_props.insert(
                            name.clone(),
                            self.resolve_refs(prop, root, visited, deadline)?,
                        );
                    }
                    out.insert(key.clone(), Value::Object(resolved_props));
                    continue;
                }
            }

            if key == "items" && value.is_object() {
                out.insert(
                    key.clone(),
                    self.resolve_refs(value, root, visited, deadline)?,
                );
                continue;
            }

            out.insert(key.clone(), value.clone());
        }

        Ok(Value::Object(out))
    }
}

/// Wall-clock budget for one transform.
struct Deadline {
    start: Instant,
    limits: TransformLimits,
}

impl Deadline {
    fn new(limits: &TransformLimits) -> Self {
        Self {
            start: Instant::now(),
            limits: limits.clone(),
        }
    }

    fn check(&self) -> Result<(), TransformError> {
        if self.start.elapsed() >= self.limits.timeout() {
            Err(TransformError::Timeout {
                budget_ms: self.limits.timeout_ms,
            })
        } else {
            Ok(())
        }
    }
}

/// Maximum nesting depth walking `properties` and `items`, with the path of
/// the deepest branch for diagnostics (`a.b[*].c` form).
fn depth_with_path(element: &Value, current_depth: usize, current_path: &str) -> (usize, String) {
    let Some(object) = element.as_object() else {
        return (current_depth, current_path.to_string());
    };

    let mut max_depth = current_depth;
    let mut deepest_path = current_path.to_string();

    if let Some(props) = object.get("properties").and_then(Value::as_object) {
        for (name, prop) in props {
            let prop_path = if current_path.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", current_path, name)
            };
            let (depth, path) = depth_with_path(prop, current_depth + 1, &prop_path);
            if depth > max_depth {
                max_depth = depth;
                deepest_path = path;
            }
        }
    }

    if let Some(items) = object.get("items") {
        let item_path = if current_path.is_empty() {
            "[*]".to_string()
        } else {
            format!("{}[*]", current_path)
        };
        let (depth, path) = depth_with_path(items, current_depth + 1, &item_path);
        if depth > max_depth {
            max_depth = depth;
            deepest_path = path;
        }
    }

    (max_depth, deepest_path)
}

fn contains_ref(element: &Value) -> bool {
    match element {
        Value::Object(object) => {
            object.contains_key("$ref") || object.values().any(contains_ref)
        }
        Value::Array(items) => items.iter().any(contains_ref),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn transformer() -> SchemaTransformer {
        SchemaTransformer::new(TransformLimits::default())
    }

    /// Object schema nested `levels` deep along `properties`.
    fn nested_schema(levels: usize) -> Value {
        let mut schema = json!({"type": "string"});
        for _ in 0..levels {
            schema = json!({
                "type": "object",
                "properties": {"inner": schema},
            });
        }
        schema
    }

    #[test]
    fn ref_free_shallow_schema_is_idempotent() {
        let schema = json!({
            "type": "object",
            "properties": {
                "path": {"type": "string"},
                "count": {"type": "integer", "minimum": 0},
            },
            "required": ["path"],
        });

        let once = transformer().transform(&schema).unwrap();
        let twice = transformer().transform(&once).unwrap();

        assert_eq!(once, schema);
        assert_eq!(twice, once);
    }

    #[test]
    fn local_refs_are_inlined_and_defs_stripped() {
        let schema = json!({
            "type": "object",
            "properties": {
                "user": {"$ref": "#/$defs/User"},
            },
            "$defs": {
                "User": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}},
                },
            },
        });

        let resolved = transformer().transform(&schema).unwrap();

        assert!(resolved.get("$defs").is_none());
        assert_eq!(resolved["properties"]["user"]["type"], "object");
        assert_eq!(
            resolved["properties"]["user"]["properties"]["name"]["type"],
            "string"
        );
    }

    #[test]
    fn definitions_container_is_also_supported() {
        let schema = json!({
            "type": "object",
            "properties": {"item": {"$ref": "#/definitions/Item"}},
            "definitions": {"Item": {"type": "integer"}},
        });

        let resolved = transformer().transform(&schema).unwrap();

        assert!(resolved.get("definitions").is_none());
        assert_eq!(resolved["properties"]["item"]["type"], "integer");
    }

    #[test]
    fn chained_refs_resolve_through() {
        let schema = json!({
            "type": "object",
            "properties": {"a": {"$ref": "#/$defs/First"}},
            "$defs": {
                "First": {"$ref": "#/$defs/Second"},
                "Second": {"type": "boolean"},
            },
        });

        let resolved = transformer().transform(&schema).unwrap();

        assert_eq!(resolved["properties"]["a"]["type"], "boolean");
    }

    #[test]
    fn diamond_reuse_of_a_def_is_not_a_cycle() {
        let schema = json!({
            "type": "object",
            "properties": {
                "left": {"$ref": "#/$defs/Shared"},
                "right": {"$ref": "#/$defs/Shared"},
            },
            "$defs": {"Shared": {"type": "string"}},
        });

        let resolved = transformer().transform(&schema).unwrap();

        assert_eq!(resolved["properties"]["left"]["type"], "string");
        assert_eq!(resolved["properties"]["right"]["type"], "string");
    }

    #[test]
    fn external_ref_is_rejected() {
        let schema = json!({
            "type": "object",
            "properties": {"x": {"$ref": "https://example.com/schema.json"}},
        });

        let result = transformer().transform(&schema);

        assert!(matches!(result, Err(TransformError::ExternalRef(_))));
    }

    #[test]
    fn circular_ref_is_rejected_without_looping() {
        let schema = json!({
            "type": "object",
            "properties": {"node": {"$ref": "#/$defs/Node"}},
            "$defs": {
                "Node": {
                    "type": "object",
                    "properties": {"next": {"$ref": "#/$defs/Node"}},
                },
            },
        });

        let result = transformer().transform(&schema);

        assert!(matches!(result, Err(TransformError::CircularRef(_))));
    }

    #[test]
    fn self_referencing_ref_is_rejected() {
        let schema = json!({
            "$defs": {"Loop": {"$ref": "#/$defs/Loop"}},
            "type": "object",
            "properties": {"x": {"$ref": "#/$defs/Loop"}},
        });

        let result = transformer().transform(&schema);

        assert!(matches!(result, Err(TransformError::CircularRef(_))));
    }

    #[test]
    fn dangling_ref_is_rejected() {
        let schema = json!({
            "type": "object",
            "properties": {"x": {"$ref": "#/$defs/Missing"}},
        });

        let result = transformer().transform(&schema);

        assert!(matches!(result, Err(TransformError::UnresolvableRef(_))));
    }

    #[test]
    fn depth_limit_reports_actual_depth_and_deepest_path() {
        let transformer = SchemaTransformer::new(TransformLimits::default().with_max_depth(10));

        let result = transformer.transform(&nested_schema(11));

        match result {
            Err(TransformError::TooDeep {
                actual,
                limit,
                deepest_path,
            }) => {
                assert_eq!(actual, 11);
                assert_eq!(limit, 10);
                assert!(deepest_path.contains("inner"));
            }
            other => panic!("expected depth fault, got {:?}", other),
        }
    }

    #[test]
    fn depth_at_the_limit_passes() {
        let transformer = SchemaTransformer::new(TransformLimits::default().with_max_depth(10));

        assert!(transformer.transform(&nested_schema(10)).is_ok());
    }

    #[test]
    fn items_count_toward_depth() {
        let schema = json!({
            "type": "object",
            "properties": {
                "rows": {
                    "type": "array",
                    "items": {
                        "type": "object",
                        "properties": {"cell": {"type": "string"}},
                    },
                },
            },
        });

        let (depth, path) = depth_with_path(&schema, 0, "");

        assert_eq!(depth, 3);
        assert_eq!(path, "rows[*].cell");
    }

    #[test]
    fn size_limit_is_checked_first() {
        let transformer = SchemaTransformer::new(TransformLimits::default().with_max_size(64));
        let schema = json!({
            "type": "object",
            "properties": {
                "a_property_with_a_reasonably_long_name": {"type": "string"},
                "another_property_with_a_long_name": {"type": "string"},
            },
        });

        match transformer.transform(&schema) {
            Err(TransformError::TooLarge { actual, limit }) => {
                assert!(actual > 64);
                assert_eq!(limit, 64);
            }
            other => panic!("expected size fault, got {:?}", other),
        }
    }

    #[test]
    fn exhausted_budget_raises_the_timeout_fault() {
        let transformer = SchemaTransformer::new(TransformLimits::default().with_timeout_ms(0));

        let result = transformer.transform(&json!({"type": "object"}));

        assert!(matches!(result, Err(TransformError::Timeout { budget_ms: 0 })));
    }

    #[test]
    fn validate_reports_without_mutating() {
        let schema = json!({
            "type": "object",
            "properties": {"user": {"$ref": "#/$defs/User"}},
            "$defs": {"User": {"type": "object"}},
        });

        let report = transformer().validate(&schema);

        assert!(report.is_valid);
        assert_eq!(report.errors.len(), 0);
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("$ref"));
        assert!(report.size_bytes > 0);
    }

    #[test]
    fn validate_flags_depth_and_size() {
        let transformer =
            SchemaTransformer::new(TransformLimits::default().with_max_depth(2).with_max_size(32));

        let report = transformer.validate(&nested_schema(4));

        assert!(!report.is_valid);
        assert_eq!(report.errors.len(), 2);
        assert_eq!(report.depth, 4);
        assert!(report.errors.iter().any(|e| e.contains("size limit")));
        assert!(report.errors.iter().any(|e| e.contains("depth limit")));
    }
}
