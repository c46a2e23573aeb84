//! Application layer for toolmend
//!
//! This crate contains the retry-orchestration use case, port definitions,
//! and application configuration. It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{DEFAULT_MAX_ATTEMPTS, RetryParams};
pub use ports::{
    chat_model::{ChatModel, GeneratorError},
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    generator::{BoundGenerator, FnGenerator, Generator},
    progress::{GenerationKind, NoRetryProgress, RetryProgressNotifier},
};
pub use use_cases::bind::{
    bind_validator, bind_validator_with_patch_retries, bind_validator_with_retries,
    patch_tool_schema,
};
pub use use_cases::validate_with_retries::{
    RetryError, RetryOutput, RetryStrategy, ValidateWithRetries,
};
