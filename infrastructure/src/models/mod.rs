//! Chat model adapters implementing the [`ChatModel`](toolmend_application::ChatModel) port.
//!
//! - [`ReplayChatModel`]: scripted responses from a file
//! - `OpenAiChatModel`: OpenAI-compatible HTTP API (feature `http-model`)

#[cfg(feature = "http-model")]
pub mod openai;
mod replay;

#[cfg(feature = "http-model")]
pub use openai::{OpenAiChatModel, OpenAiConfig};
pub use replay::{ReplayChatModel, ReplayLoadError, parse_replay};
