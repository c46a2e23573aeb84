//! Tool domain traits
//!
//! Contains pure domain logic traits for tool validation.
//! The full JSON-Schema validator lives in the infrastructure layer.

use super::entities::{ToolCall, ToolSchema};

/// Validator for tool calls
///
/// Checks a call's argument payload against the schema it claims to
/// satisfy, without any I/O. The error string is what the generator will
/// be shown, after passing through an error formatter.
pub trait ToolValidator: Send + Sync {
    /// Validate a tool call against its schema
    fn validate(&self, call: &ToolCall, schema: &ToolSchema) -> Result<(), String>;
}

/// Lightweight structural validator.
///
/// Only checks that the payload is an object, that every `required`
/// property is present, and, when the schema sets
/// `additionalProperties: false`, that no undeclared property appears.
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl ToolValidator for DefaultToolValidator {
    fn validate(&self, call: &ToolCall, schema: &ToolSchema) -> Result<(), String> {
        let Some(args) = call.args.as_object() else {
            return Err(format!(
                "Arguments for tool '{}' must be a JSON object",
                schema.name
            ));
        };

        for param in schema.required() {
            if !args.contains_key(param) {
                return Err(format!(
                    "Missing required parameter '{}' for tool '{}'",
                    param, schema.name
                ));
            }
        }

        let closed = schema
            .parameters
            .get("additionalProperties")
            .and_then(|v| v.as_bool())
            == Some(false);
        if closed && let Some(properties) = schema.properties() {
            for arg_name in args.keys() {
                if !properties.contains_key(arg_name) {
                    return Err(format!(
                        "Unknown parameter '{}' for tool '{}'",
                        arg_name, schema.name
                    ));
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema(additional: bool) -> ToolSchema {
        ToolSchema::new(
            "test",
            "test tool",
            json!({
                "type": "object",
                "properties": {
                    "required_param": { "type": "string" },
                    "optional_param": { "type": "string" }
                },
                "required": ["required_param"],
                "additionalProperties": additional
            }),
        )
    }

    #[test]
    fn test_validator_missing_required() {
        let call = ToolCall::new("1", "test");
        let result = DefaultToolValidator.validate(&call, &schema(true));
        assert!(result.unwrap_err().contains("Missing required parameter"));
    }

    #[test]
    fn test_validator_unknown_param_on_closed_schema() {
        let call = ToolCall::new("1", "test")
            .with_arg("required_param", "v")
            .with_arg("unknown_param", "value");
        let result = DefaultToolValidator.validate(&call, &schema(false));
        assert!(result.unwrap_err().contains("Unknown parameter"));
    }

    #[test]
    fn test_validator_unknown_param_allowed_on_open_schema() {
        let call = ToolCall::new("1", "test")
            .with_arg("required_param", "v")
            .with_arg("unknown_param", "value");
        assert!(DefaultToolValidator.validate(&call, &schema(true)).is_ok());
    }

    #[test]
    fn test_validator_rejects_non_object_args() {
        let call = ToolCall::new("1", "test").with_args(json!("not an object"));
        let result = DefaultToolValidator.validate(&call, &schema(true));
        assert!(result.unwrap_err().contains("must be a JSON object"));
    }
}
