//! JSONPatch corrections for tool call arguments.
//!
//! The patch-based retry variant lets the generator repair a previous tool
//! call instead of re-emitting it. A [`PatchCorrection`] names the call it
//! targets and carries an ordered list of [`JsonPatch`] operations, which are
//! applied to that call's argument payload with [`apply_patches`].
//!
//! Only the `add`, `remove` and `replace` operations of RFC 6902 are
//! supported. Paths are RFC 6901 JSON pointers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// Name of the synthetic correction tool offered to the fallback generator.
pub const PATCH_TOOL_NAME: &str = "PatchFunctionParameters";

/// Description of the synthetic correction tool.
pub const PATCH_TOOL_DESCRIPTION: &str = "Respond with all JSONPatch operations to correct \
validation errors caused by passing in incorrect or incomplete parameters in a previous tool call.";

/// Operation kind of a [`JsonPatch`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
    Replace,
}

impl PatchOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOp::Add => "add",
            PatchOp::Remove => "remove",
            PatchOp::Replace => "replace",
        }
    }
}

impl fmt::Display for PatchOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A JSON Patch operation to be performed on a JSON document.
///
/// The op and path are always required. Value is required for every
/// operation except 'remove'. Examples:
/// `{"op": "add", "path": "/a/b/c", "value": 1}`,
/// `{"op": "replace", "path": "/a/b/c", "value": 2}`,
/// `{"op": "remove", "path": "/a/b/c"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct JsonPatch {
    /// The operation to be performed. Must be one of 'add', 'remove', 'replace'.
    pub op: PatchOp,
    /// A JSON Pointer path that references a location within the target document.
    pub path: String,
    /// The value to be used within the operation. Required for 'add' and 'replace'.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl JsonPatch {
    pub fn add(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
        }
    }

    pub fn replace(path: impl Into<String>, value: Value) -> Self {
        Self {
            op: PatchOp::Replace,
            path: path.into(),
            value: Some(value),
        }
    }
}

/// Respond with all JSONPatch operations needed to correct the validation
/// errors of a previous tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PatchCorrection {
    /// The ID of the original tool call that generated the error. Must NOT be
    /// the ID of a PatchFunctionParameters tool call.
    pub tool_call_id: String,
    /// Think step-by-step, listing each validation error and the JSONPatch
    /// operation needed to correct it. Cite the fields in the JSON Schema you
    /// referenced in developing this plan.
    pub reasoning: String,
    /// A list of JSONPatch operations to be applied to the previous tool
    /// call's arguments.
    pub patches: Vec<JsonPatch>,
}

impl PatchCorrection {
    /// Read a correction out of a tool call's argument payload.
    ///
    /// Only `tool_call_id` is mandatory; a missing or null `patches` list is
    /// treated as empty. Returns `None` when the payload cannot be read as a
    /// correction at all.
    pub fn from_args(args: &Value) -> Option<Self> {
        let tool_call_id = args.get("tool_call_id")?.as_str()?.to_string();
        let patches = match args.get("patches") {
            None | Some(Value::Null) => Vec::new(),
            Some(value) => serde_json::from_value(value.clone()).ok()?,
        };
        let reasoning = args
            .get("reasoning")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        Some(Self {
            tool_call_id,
            reasoning,
            patches,
        })
    }
}

/// Errors raised while applying a patch list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatchError {
    #[error("Invalid JSON pointer '{0}'")]
    InvalidPointer(String),

    #[error("Path '{0}' does not exist")]
    PathNotFound(String),

    #[error("Invalid array index in path '{0}'")]
    InvalidIndex(String),

    #[error("Operation '{op}' at '{path}' requires a value")]
    MissingValue { op: PatchOp, path: String },

    #[error("Cannot remove the document root")]
    RemoveRoot,
}

/// Apply `patches` in order to a copy of `doc`.
///
/// Either every operation succeeds and the patched copy is returned, or the
/// first failure is returned and `doc` is left as it was.
pub fn apply_patches(doc: &Value, patches: &[JsonPatch]) -> Result<Value, PatchError> {
    let mut patched = doc.clone();
    for patch in patches {
        apply_one(&mut patched, patch)?;
    }
    Ok(patched)
}

fn apply_one(doc: &mut Value, patch: &JsonPatch) -> Result<(), PatchError> {
    let path = patch.path.as_str();
    let value = || {
        patch.value.clone().ok_or_else(|| PatchError::MissingValue {
            op: patch.op,
            path: path.to_string(),
        })
    };

    if path.is_empty() {
        return match patch.op {
            PatchOp::Add | PatchOp::Replace => {
                *doc = value()?;
                Ok(())
            }
            PatchOp::Remove => Err(PatchError::RemoveRoot),
        };
    }

    let (parent_path, token) = split_pointer(path)?;
    let parent = doc
        .pointer_mut(parent_path)
        .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;

    match (patch.op, parent) {
        (PatchOp::Add, Value::Object(map)) => {
            map.insert(token, value()?);
        }
        (PatchOp::Add, Value::Array(items)) => {
            if token == "-" {
                items.push(value()?);
            } else {
                let index = parse_index(&token, path)?;
                if index > items.len() {
                    return Err(PatchError::InvalidIndex(path.to_string()));
                }
                items.insert(index, value()?);
            }
        }
        (PatchOp::Remove, Value::Object(map)) => {
            map.remove(&token)
                .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
        }
        (PatchOp::Remove, Value::Array(items)) => {
            let index = parse_index(&token, path)?;
            if index >= items.len() {
                return Err(PatchError::InvalidIndex(path.to_string()));
            }
            items.remove(index);
        }
        (PatchOp::Replace, Value::Object(map)) => {
            let slot = map
                .get_mut(&token)
                .ok_or_else(|| PatchError::PathNotFound(path.to_string()))?;
            *slot = value()?;
        }
        (PatchOp::Replace, Value::Array(items)) => {
            let index = parse_index(&token, path)?;
            let slot = items
                .get_mut(index)
                .ok_or_else(|| PatchError::InvalidIndex(path.to_string()))?;
            *slot = value()?;
        }
        _ => return Err(PatchError::PathNotFound(path.to_string())),
    }
    Ok(())
}

/// Split a non-empty pointer into its (still escaped) parent pointer and its
/// unescaped last reference token.
fn split_pointer(path: &str) -> Result<(&str, String), PatchError> {
    if !path.starts_with('/') {
        return Err(PatchError::InvalidPointer(path.to_string()));
    }
    let (parent, last) = path
        .rsplit_once('/')
        .ok_or_else(|| PatchError::InvalidPointer(path.to_string()))?;
    Ok((parent, last.replace("~1", "/").replace("~0", "~")))
}

fn parse_index(token: &str, path: &str) -> Result<usize, PatchError> {
    let well_formed = !token.is_empty()
        && token.bytes().all(|b| b.is_ascii_digit())
        && (token == "0" || !token.starts_with('0'));
    if !well_formed {
        return Err(PatchError::InvalidIndex(path.to_string()));
    }
    token
        .parse()
        .map_err(|_| PatchError::InvalidIndex(path.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn replace_existing_field() {
        let doc = json!({"a": 1});
        let patched = apply_patches(&doc, &[JsonPatch::replace("/a", json!(2))]).unwrap();
        assert_eq!(patched, json!({"a": 2}));
    }

    #[test]
    fn empty_patch_list_leaves_document_unchanged() {
        let doc = json!({"a": {"b": [1, 2]}});
        assert_eq!(apply_patches(&doc, &[]).unwrap(), doc);
    }

    #[test]
    fn add_nested_field_and_append_to_array() {
        let doc = json!({"a": {"items": [1]}});
        let patched = apply_patches(
            &doc,
            &[
                JsonPatch::add("/a/name", json!("x")),
                JsonPatch::add("/a/items/-", json!(2)),
                JsonPatch::add("/a/items/0", json!(0)),
            ],
        )
        .unwrap();
        assert_eq!(patched, json!({"a": {"name": "x", "items": [0, 1, 2]}}));
    }

    #[test]
    fn remove_field_and_array_element() {
        let doc = json!({"a": 1, "b": [1, 2, 3]});
        let patched = apply_patches(
            &doc,
            &[JsonPatch::remove("/a"), JsonPatch::remove("/b/1")],
        )
        .unwrap();
        assert_eq!(patched, json!({"b": [1, 3]}));
    }

    #[test]
    fn escaped_tokens_are_unescaped() {
        let doc = json!({"a/b": 1, "c~d": 2});
        let patched = apply_patches(
            &doc,
            &[
                JsonPatch::replace("/a~1b", json!(10)),
                JsonPatch::replace("/c~0d", json!(20)),
            ],
        )
        .unwrap();
        assert_eq!(patched, json!({"a/b": 10, "c~d": 20}));
    }

    #[test]
    fn replace_root() {
        let patched = apply_patches(&json!({"a": 1}), &[JsonPatch::replace("", json!([1]))]).unwrap();
        assert_eq!(patched, json!([1]));
        assert_eq!(
            apply_patches(&json!({}), &[JsonPatch::remove("")]),
            Err(PatchError::RemoveRoot)
        );
    }

    #[test]
    fn failure_is_atomic() {
        let doc = json!({"a": 1});
        let result = apply_patches(
            &doc,
            &[
                JsonPatch::replace("/a", json!(2)),
                JsonPatch::replace("/missing", json!(3)),
            ],
        );
        assert_eq!(result, Err(PatchError::PathNotFound("/missing".to_string())));
        assert_eq!(doc, json!({"a": 1}));
    }

    #[test]
    fn invalid_inputs_are_rejected() {
        let doc = json!({"a": [1]});
        assert_eq!(
            apply_patches(&doc, &[JsonPatch::add("a", json!(1))]),
            Err(PatchError::InvalidPointer("a".to_string()))
        );
        assert_eq!(
            apply_patches(&doc, &[JsonPatch::add("/a/01", json!(1))]),
            Err(PatchError::InvalidIndex("/a/01".to_string()))
        );
        assert_eq!(
            apply_patches(&doc, &[JsonPatch::remove("/a/5")]),
            Err(PatchError::InvalidIndex("/a/5".to_string()))
        );
        let missing_value = JsonPatch {
            op: PatchOp::Add,
            path: "/b".to_string(),
            value: None,
        };
        assert_eq!(
            apply_patches(&doc, &[missing_value]),
            Err(PatchError::MissingValue {
                op: PatchOp::Add,
                path: "/b".to_string()
            })
        );
    }

    #[test]
    fn correction_from_args_is_lenient_about_patches() {
        let correction = PatchCorrection::from_args(&json!({"tool_call_id": "call_1"})).unwrap();
        assert_eq!(correction.tool_call_id, "call_1");
        assert!(correction.patches.is_empty());

        let correction = PatchCorrection::from_args(&json!({
            "tool_call_id": "call_1",
            "reasoning": "answer must mention llamas",
            "patches": [{"op": "replace", "path": "/answer", "value": "llama"}]
        }))
        .unwrap();
        assert_eq!(correction.patches, vec![JsonPatch::replace("/answer", json!("llama"))]);

        assert!(PatchCorrection::from_args(&json!({"patches": []})).is_none());
        assert!(PatchCorrection::from_args(&json!({"tool_call_id": "x", "patches": "nope"})).is_none());
    }

    #[test]
    fn correction_schema_requires_core_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(PatchCorrection)).unwrap();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("tool_call_id")));
        assert!(required.contains(&json!("patches")));
    }
}
