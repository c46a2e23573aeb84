//! Conversation domain.
//!
//! - [`message::Message`]: a single message, optionally carrying tool calls
//! - [`input::ConversationInput`]: caller input normalized to a message list

pub mod input;
pub mod message;

pub use input::{ConversationInput, PromptValue};
pub use message::{Message, Role};
