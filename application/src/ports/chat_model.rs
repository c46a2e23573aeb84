//! Chat model port
//!
//! Defines the interface for talking to a tool-calling model backend.
//! Implementations (adapters) live in the infrastructure layer; model
//! selection, authentication and network retries are their concern.

use async_trait::async_trait;
use thiserror::Error;
use toolmend_domain::{Message, ToolSchema};

/// Errors that can occur while generating a message
#[derive(Error, Debug)]
pub enum GeneratorError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("No more responses available")]
    Exhausted,

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

/// A model backend that can emit structured tool calls.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Identifier used in logs (e.g. the model name)
    fn name(&self) -> &str;

    /// Generate one assistant message for `messages`.
    ///
    /// `tools` are the callable schemas; `tool_choice`, when set, forces a
    /// tool call (a tool name, or `"any"` for any tool).
    async fn generate(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        tool_choice: Option<&str>,
    ) -> Result<Message, GeneratorError>;
}
