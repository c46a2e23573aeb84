//! Infrastructure layer for toolmend
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer: chat models, a JSON Schema tool validator, tool and
//! replay file loading, configuration file loading and the JSONL
//! conversation logger.

pub mod config;
pub mod logging;
pub mod models;
pub mod tools;
pub mod validation;

// Re-export commonly used types
pub use config::{
    ConfigError, ConfigLoader, FileConfig, FileLoggingConfig, FileModelConfig, FileRetryConfig,
};
pub use logging::JsonlConversationLogger;
#[cfg(feature = "http-model")]
pub use models::{OpenAiChatModel, OpenAiConfig};
pub use models::{ReplayChatModel, ReplayLoadError};
pub use tools::{ToolSchemaLoadError, load_tool_schemas, load_tool_set};
pub use validation::JsonSchemaToolValidator;
