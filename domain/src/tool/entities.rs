//! Tool domain entities

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Schema of a tool the generator may call.
///
/// `parameters` is a JSON Schema object describing the argument payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique name of the tool (e.g., "Respond")
    pub name: String,
    /// Human-readable description
    #[serde(default)]
    pub description: String,
    /// JSON Schema for the argument payload
    pub parameters: Value,
}

impl ToolSchema {
    pub fn new(name: impl Into<String>, description: impl Into<String>, parameters: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Derive the parameter schema from a Rust type.
    pub fn from_type<T: schemars::JsonSchema>(
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, serde_json::Error> {
        let schema = schemars::schema_for!(T);
        Ok(Self::new(name, description, serde_json::to_value(schema)?))
    }

    /// Property names declared by the schema, if it describes an object.
    pub fn properties(&self) -> Option<&serde_json::Map<String, Value>> {
        self.parameters.get("properties").and_then(|p| p.as_object())
    }

    /// Required property names declared by the schema.
    pub fn required(&self) -> Vec<&str> {
        self.parameters
            .get("required")
            .and_then(|r| r.as_array())
            .map(|r| r.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }

    /// Pretty-printed parameter schema, used in correction prompts.
    pub fn parameters_json(&self) -> String {
        serde_json::to_string_pretty(&self.parameters).unwrap_or_else(|_| self.parameters.to_string())
    }
}

/// The set of tools a generator is bound to.
#[derive(Debug, Clone, Default)]
pub struct ToolSet {
    tools: HashMap<String, ToolSchema>,
}

impl ToolSet {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    pub fn register(mut self, tool: ToolSchema) -> Self {
        self.tools.insert(tool.name.clone(), tool);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolSchema> {
        self.tools.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.tools.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Tool names in sorted order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.tools.keys().map(|s| s.as_str()).collect();
        names.sort_unstable();
        names
    }

    /// All schemas, sorted by name.
    pub fn schemas(&self) -> Vec<&ToolSchema> {
        let mut tools: Vec<&ToolSchema> = self.tools.values().collect();
        tools.sort_by(|a, b| a.name.cmp(&b.name));
        tools
    }
}

impl FromIterator<ToolSchema> for ToolSet {
    fn from_iter<I: IntoIterator<Item = ToolSchema>>(iter: I) -> Self {
        iter.into_iter().fold(ToolSet::new(), ToolSet::register)
    }
}

/// A structured function invocation emitted by a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Generator-assigned identifier
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Argument payload
    #[serde(default = "empty_object")]
    pub args: Value,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            args: empty_object(),
        }
    }

    pub fn with_args(mut self, args: Value) -> Self {
        self.args = args;
        self
    }

    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        if !self.args.is_object() {
            self.args = empty_object();
        }
        if let Value::Object(map) = &mut self.args {
            map.insert(key.into(), value.into());
        }
        self
    }

    /// Get a string argument
    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(|v| v.as_str())
    }
}
