//! Input adapter: normalizes caller input into a message list.
//!
//! Callers hand the retry loop either a flat list of messages or a
//! structured [`PromptValue`]. Input that arrives as raw JSON (for example
//! from a file) goes through [`ConversationInput::from_json`], which rejects
//! any other shape before a single generation call is made.

use super::message::Message;
use crate::core::error::DomainError;
use serde_json::Value;

/// A structured prompt that can be rendered as a message list.
#[derive(Debug, Clone, PartialEq)]
pub enum PromptValue {
    /// Plain text, rendered as one user message.
    Text(String),
    /// An already-rendered chat prompt.
    Chat(Vec<Message>),
}

impl PromptValue {
    pub fn to_messages(&self) -> Vec<Message> {
        match self {
            PromptValue::Text(text) => vec![Message::user(text.clone())],
            PromptValue::Chat(messages) => messages.clone(),
        }
    }
}

/// Caller input accepted by the retry loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversationInput {
    Messages(Vec<Message>),
    Prompt(PromptValue),
}

impl ConversationInput {
    /// Decode raw JSON input.
    ///
    /// - array → message list
    /// - object with `messages` → chat prompt value
    /// - object with `text` → text prompt value
    pub fn from_json(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Array(_) => Ok(Self::Messages(parse_messages(value)?)),
            Value::Object(mut map) => {
                if let Some(messages) = map.remove("messages") {
                    if !messages.is_array() {
                        return Err(DomainError::InputFormat(format!(
                            "'messages' must be an array, got {}",
                            json_kind(&messages)
                        )));
                    }
                    return Ok(Self::Prompt(PromptValue::Chat(parse_messages(messages)?)));
                }
                match map.remove("text") {
                    Some(Value::String(text)) => Ok(Self::Prompt(PromptValue::Text(text))),
                    Some(other) => Err(DomainError::InputFormat(format!(
                        "'text' must be a string, got {}",
                        json_kind(&other)
                    ))),
                    None => Err(DomainError::InputFormat(
                        "object without 'messages' or 'text'".to_string(),
                    )),
                }
            }
            other => Err(DomainError::InputFormat(json_kind(&other).to_string())),
        }
    }

    /// Flatten into the internal message list.
    pub fn into_messages(self) -> Vec<Message> {
        match self {
            ConversationInput::Messages(messages) => messages,
            ConversationInput::Prompt(prompt) => prompt.to_messages(),
        }
    }
}

impl From<Vec<Message>> for ConversationInput {
    fn from(messages: Vec<Message>) -> Self {
        Self::Messages(messages)
    }
}

impl From<PromptValue> for ConversationInput {
    fn from(prompt: PromptValue) -> Self {
        Self::Prompt(prompt)
    }
}

fn parse_messages(value: Value) -> Result<Vec<Message>, DomainError> {
    serde_json::from_value(value)
        .map_err(|e| DomainError::InputFormat(format!("invalid message list: {}", e)))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
