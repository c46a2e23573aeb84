//! Replay chat model: serves pre-recorded assistant messages in order.
//!
//! Useful for offline runs and for reproducing a correction transcript.
//! A replay file is either a JSON array of messages or JSON Lines with one
//! message per line. Entries without a `role` are taken as assistant
//! messages.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use toolmend_application::{ChatModel, GeneratorError};
use toolmend_domain::{Message, ToolSchema};
use tracing::debug;

/// Errors raised while loading a replay script.
#[derive(Error, Debug)]
pub enum ReplayLoadError {
    #[error("Failed to read replay file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Replay entry is not a valid message: {0}")]
    Json(#[from] serde_json::Error),
}

/// [`ChatModel`] that replays a fixed script, ignoring its inputs.
pub struct ReplayChatModel {
    responses: Mutex<VecDeque<Message>>,
}

impl ReplayChatModel {
    pub fn new(responses: impl IntoIterator<Item = Message>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
        }
    }

    /// Load a replay script from a file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ReplayLoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ReplayLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(parse_replay(&text)?))
    }

    /// Responses not yet served.
    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|r| r.len()).unwrap_or(0)
    }
}

/// Parse a replay script (JSON array or JSON Lines).
pub fn parse_replay(text: &str) -> Result<Vec<Message>, ReplayLoadError> {
    let trimmed = text.trim_start();
    let entries: Vec<Value> = if trimmed.starts_with('[') {
        serde_json::from_str(trimmed)?
    } else {
        trimmed
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(serde_json::from_str)
            .collect::<Result<_, _>>()?
    };

    entries
        .into_iter()
        .map(|mut entry| {
            if let Value::Object(map) = &mut entry
                && !map.contains_key("role")
            {
                map.insert("role".to_string(), Value::String("assistant".to_string()));
            }
            serde_json::from_value(entry).map_err(ReplayLoadError::from)
        })
        .collect()
}

#[async_trait]
impl ChatModel for ReplayChatModel {
    fn name(&self) -> &str {
        "replay"
    }

    async fn generate(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        tool_choice: Option<&str>,
    ) -> Result<Message, GeneratorError> {
        let mut responses = self
            .responses
            .lock()
            .map_err(|e| GeneratorError::Other(e.to_string()))?;
        debug!(
            "Replaying response ({} left) for {} message(s), tools={:?}, tool_choice={:?}",
            responses.len(),
            messages.len(),
            tools.iter().map(|t| t.name.as_str()).collect::<Vec<_>>(),
            tool_choice
        );
        responses.pop_front().ok_or(GeneratorError::Exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolmend_domain::Role;

    #[test]
    fn test_parse_json_array() {
        let messages = parse_replay(
            r#"[
                {"content": "first", "tool_calls": [{"id": "c1", "name": "Respond", "args": {"a": 1}}]},
                {"role": "assistant", "content": "second"}
            ]"#,
        )
        .unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::Assistant);
        assert_eq!(messages[0].tool_calls[0].id, "c1");
        assert_eq!(messages[1].content, "second");
    }

    #[test]
    fn test_parse_json_lines() {
        let messages = parse_replay(
            "{\"content\": \"one\"}\n\n{\"role\": \"ai\", \"content\": \"two\"}\n",
        )
        .unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::Assistant);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_replay("not json").is_err());
    }

    #[tokio::test]
    async fn test_serves_in_order_then_exhausts() {
        let model = ReplayChatModel::new(vec![Message::assistant("a"), Message::assistant("b")]);
        assert_eq!(model.remaining(), 2);
        assert_eq!(model.generate(&[], &[], None).await.unwrap().content, "a");
        assert_eq!(model.generate(&[], &[], None).await.unwrap().content, "b");
        assert!(matches!(
            model.generate(&[], &[], None).await,
            Err(GeneratorError::Exhausted)
        ));
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("replay.jsonl");
        std::fs::write(&path, "{\"content\": \"hi\"}\n").unwrap();
        let model = ReplayChatModel::from_path(&path).unwrap();
        assert_eq!(model.remaining(), 1);
    }
}
