//! Tool-call validators backed by external crates.

mod jsonschema_validator;

pub use jsonschema_validator::JsonSchemaToolValidator;
