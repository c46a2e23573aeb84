//! Tool schema loading
//!
//! Reads the tool definitions a model is bound to from JSON files.

mod schema_file;

pub use schema_file::{
    ToolSchemaLoadError, load_tool_schemas, load_tool_set, parse_tool_schemas,
};
