//! Full JSON Schema validation of tool-call arguments.

use jsonschema::Validator;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use toolmend_domain::{ToolCall, ToolSchema, ToolValidator};
use tracing::debug;

/// [`ToolValidator`] backed by the `jsonschema` crate.
///
/// Compiled validators are cached per tool name and recompiled when the
/// schema registered under that name changes.
#[derive(Default)]
pub struct JsonSchemaToolValidator {
    cache: Mutex<HashMap<String, (Value, Arc<Validator>)>>,
}

impl JsonSchemaToolValidator {
    pub fn new() -> Self {
        Self::default()
    }

    fn compiled(&self, schema: &ToolSchema) -> Result<Arc<Validator>, String> {
        if let Ok(cache) = self.cache.lock()
            && let Some((cached_schema, validator)) = cache.get(&schema.name)
            && cached_schema == &schema.parameters
        {
            return Ok(validator.clone());
        }

        debug!("Compiling JSON schema for tool '{}'", schema.name);
        let validator = jsonschema::validator_for(&schema.parameters)
            .map(Arc::new)
            .map_err(|e| format!("Invalid JSON schema for tool '{}': {}", schema.name, e))?;

        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(
                schema.name.clone(),
                (schema.parameters.clone(), validator.clone()),
            );
        }
        Ok(validator)
    }
}

impl ToolValidator for JsonSchemaToolValidator {
    fn validate(&self, call: &ToolCall, schema: &ToolSchema) -> Result<(), String> {
        let validator = self.compiled(schema)?;
        let errors: Vec<String> = validator
            .iter_errors(&call.args)
            .map(|e| {
                let path = e.instance_path.to_string();
                if path.is_empty() {
                    e.to_string()
                } else {
                    format!("{}: {}", path, e)
                }
            })
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(format!(
                "Invalid arguments for tool '{}':\n- {}",
                schema.name,
                errors.join("\n- ")
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person_schema() -> ToolSchema {
        ToolSchema::new(
            "Person",
            "A person",
            json!({
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "age": { "type": "integer", "minimum": 0 }
                },
                "required": ["name", "age"],
                "additionalProperties": false
            }),
        )
    }

    #[test]
    fn test_valid_arguments_pass() {
        let call = ToolCall::new("c1", "Person").with_args(json!({"name": "Ada", "age": 36}));
        assert!(JsonSchemaToolValidator::new().validate(&call, &person_schema()).is_ok());
    }

    #[test]
    fn test_type_and_range_errors_are_reported_with_paths() {
        let call = ToolCall::new("c1", "Person").with_args(json!({"name": 7, "age": -1}));
        let err = JsonSchemaToolValidator::new()
            .validate(&call, &person_schema())
            .unwrap_err();
        assert!(err.starts_with("Invalid arguments for tool 'Person'"));
        assert!(err.contains("/name"));
        assert!(err.contains("/age"));
    }

    #[test]
    fn test_missing_and_extra_properties_fail() {
        let validator = JsonSchemaToolValidator::new();
        let missing = ToolCall::new("c1", "Person").with_args(json!({"name": "Ada"}));
        assert!(validator.validate(&missing, &person_schema()).unwrap_err().contains("age"));

        let extra = ToolCall::new("c2", "Person")
            .with_args(json!({"name": "Ada", "age": 1, "nickname": "A"}));
        assert!(validator.validate(&extra, &person_schema()).is_err());
    }

    #[test]
    fn test_cache_follows_schema_changes() {
        let validator = JsonSchemaToolValidator::new();
        let call = ToolCall::new("c1", "Person").with_args(json!({"name": "Ada"}));
        assert!(validator.validate(&call, &person_schema()).is_err());

        let relaxed = ToolSchema::new(
            "Person",
            "A person",
            json!({"type": "object", "required": ["name"]}),
        );
        assert!(validator.validate(&call, &relaxed).is_ok());
    }

    #[test]
    fn test_invalid_schema_is_reported_as_error() {
        let broken = ToolSchema::new("Broken", "", json!({"type": 12}));
        let call = ToolCall::new("c1", "Broken");
        let err = JsonSchemaToolValidator::new().validate(&call, &broken).unwrap_err();
        assert!(err.contains("Invalid JSON schema for tool 'Broken'"));
    }
}
