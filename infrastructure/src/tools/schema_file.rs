//! Tool schema files.
//!
//! A tools file is JSON holding either an array of tools or an object with
//! a `tools` array. Each entry may be written in any of the common shapes:
//!
//! - `{"name", "description", "parameters"}`
//! - OpenAI function tools: `{"type": "function", "function": {...}}`
//! - Anthropic tools: `{"name", "description", "input_schema"}`

use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;
use toolmend_domain::{ToolSchema, ToolSet};

/// Errors raised while loading a tools file.
#[derive(Error, Debug)]
pub enum ToolSchemaLoadError {
    #[error("Failed to read tools file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Tools file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Tools file must be an array of tools or an object with a \"tools\" array")]
    UnexpectedShape,

    #[error("Tool #{index}: {message}")]
    InvalidTool { index: usize, message: String },

    #[error("Tool '{0}' is defined more than once")]
    DuplicateTool(String),
}

/// Read and parse a tools file.
pub fn load_tool_schemas(path: impl AsRef<Path>) -> Result<Vec<ToolSchema>, ToolSchemaLoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| ToolSchemaLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_tool_schemas(&text)
}

/// Read a tools file into a [`ToolSet`].
pub fn load_tool_set(path: impl AsRef<Path>) -> Result<ToolSet, ToolSchemaLoadError> {
    Ok(load_tool_schemas(path)?.into_iter().collect())
}

/// Parse tool schemas from JSON text, preserving file order.
pub fn parse_tool_schemas(text: &str) -> Result<Vec<ToolSchema>, ToolSchemaLoadError> {
    let value: Value = serde_json::from_str(text)?;
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut map) => match map.remove("tools") {
            Some(Value::Array(entries)) => entries,
            _ => return Err(ToolSchemaLoadError::UnexpectedShape),
        },
        _ => return Err(ToolSchemaLoadError::UnexpectedShape),
    };

    let mut schemas: Vec<ToolSchema> = Vec::with_capacity(entries.len());
    for (index, entry) in entries.into_iter().enumerate() {
        let schema = parse_entry(entry)
            .map_err(|message| ToolSchemaLoadError::InvalidTool { index, message })?;
        if schemas.iter().any(|s| s.name == schema.name) {
            return Err(ToolSchemaLoadError::DuplicateTool(schema.name));
        }
        schemas.push(schema);
    }
    Ok(schemas)
}

fn parse_entry(entry: Value) -> Result<ToolSchema, String> {
    let Value::Object(mut map) = entry else {
        return Err("expected an object".to_string());
    };

    // OpenAI function tools nest the definition one level down
    if map.get("type").and_then(Value::as_str) == Some("function")
        && let Some(Value::Object(function)) = map.remove("function")
    {
        map = function;
    }

    let name = match map.remove("name") {
        Some(Value::String(name)) if !name.trim().is_empty() => name,
        _ => return Err("missing or empty \"name\"".to_string()),
    };
    let description = match map.remove("description") {
        Some(Value::String(d)) => d,
        None | Some(Value::Null) => String::new(),
        Some(_) => return Err(format!("\"description\" of '{}' must be a string", name)),
    };
    let parameters = map
        .remove("parameters")
        .or_else(|| map.remove("input_schema"))
        .unwrap_or_else(|| serde_json::json!({"type": "object", "properties": {}}));
    if !parameters.is_object() {
        return Err(format!("parameters of '{}' must be a JSON object", name));
    }

    Ok(ToolSchema::new(name, description, parameters))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_array() {
        let schemas = parse_tool_schemas(
            r#"[{"name": "Respond", "description": "Answer", "parameters": {"type": "object"}}]"#,
        )
        .unwrap();
        assert_eq!(schemas.len(), 1);
        assert_eq!(schemas[0].name, "Respond");
        assert_eq!(schemas[0].description, "Answer");
    }

    #[test]
    fn test_parse_openai_and_anthropic_shapes() {
        let schemas = parse_tool_schemas(
            r#"{"tools": [
                {"type": "function", "function": {"name": "a", "parameters": {"type": "object"}}},
                {"name": "b", "input_schema": {"type": "object", "required": ["x"]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(schemas[0].name, "a");
        assert_eq!(schemas[0].description, "");
        assert_eq!(schemas[1].name, "b");
        assert_eq!(schemas[1].required(), vec!["x"]);
    }

    #[test]
    fn test_missing_parameters_default_to_empty_object() {
        let schemas = parse_tool_schemas(r#"[{"name": "ping"}]"#).unwrap();
        assert_eq!(schemas[0].parameters["type"], "object");
    }

    #[test]
    fn test_rejects_bad_shapes() {
        assert!(matches!(
            parse_tool_schemas(r#""nope""#),
            Err(ToolSchemaLoadError::UnexpectedShape)
        ));
        assert!(matches!(
            parse_tool_schemas(r#"[{"description": "no name"}]"#),
            Err(ToolSchemaLoadError::InvalidTool { index: 0, .. })
        ));
        assert!(matches!(
            parse_tool_schemas(r#"[{"name": "a"}, {"name": "a"}]"#),
            Err(ToolSchemaLoadError::DuplicateTool(name)) if name == "a"
        ));
        assert!(matches!(
            parse_tool_schemas("{"),
            Err(ToolSchemaLoadError::Json(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tools.json");
        std::fs::write(&path, r#"[{"name": "Respond", "parameters": {"type": "object"}}]"#).unwrap();
        let tools = load_tool_set(&path).unwrap();
        assert!(tools.contains("Respond"));

        let err = load_tool_schemas(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ToolSchemaLoadError::Io { .. }));
    }
}
