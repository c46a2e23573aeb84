//! Generator port and bindings
//!
//! A [`Generator`] turns a conversation into exactly one new assistant
//! message. It holds no retry logic; the orchestrator decides when and how
//! often it is called.
//!
//! - [`BoundGenerator`]: a [`ChatModel`] bound to a fixed tool set
//! - [`FnGenerator`]: a plain synchronous closure

use super::chat_model::{ChatModel, GeneratorError};
use async_trait::async_trait;
use std::sync::Arc;
use toolmend_domain::{Message, ToolSchema};

/// Conversation in, one assistant message out.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, messages: &[Message]) -> Result<Message, GeneratorError>;
}

/// A chat model bound to a fixed set of tools and an optional forced choice.
pub struct BoundGenerator {
    model: Arc<dyn ChatModel>,
    tools: Vec<ToolSchema>,
    tool_choice: Option<String>,
}

impl BoundGenerator {
    pub fn new(model: Arc<dyn ChatModel>, tools: Vec<ToolSchema>) -> Self {
        Self {
            model,
            tools,
            tool_choice: None,
        }
    }

    pub fn with_tool_choice(mut self, tool_choice: Option<String>) -> Self {
        self.tool_choice = tool_choice;
        self
    }

    pub fn tools(&self) -> &[ToolSchema] {
        &self.tools
    }

    pub fn tool_choice(&self) -> Option<&str> {
        self.tool_choice.as_deref()
    }
}

#[async_trait]
impl Generator for BoundGenerator {
    async fn generate(&self, messages: &[Message]) -> Result<Message, GeneratorError> {
        self.model
            .generate(messages, &self.tools, self.tool_choice.as_deref())
            .await
    }
}

/// Adapts a synchronous closure into a [`Generator`].
pub struct FnGenerator<F>(F);

impl<F> FnGenerator<F>
where
    F: Fn(&[Message]) -> Result<Message, GeneratorError> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> Generator for FnGenerator<F>
where
    F: Fn(&[Message]) -> Result<Message, GeneratorError> + Send + Sync,
{
    async fn generate(&self, messages: &[Message]) -> Result<Message, GeneratorError> {
        (self.0)(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingModel {
        seen: Mutex<Vec<(Vec<String>, Option<String>)>>,
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        fn name(&self) -> &str {
            "recording"
        }

        async fn generate(
            &self,
            _messages: &[Message],
            tools: &[ToolSchema],
            tool_choice: Option<&str>,
        ) -> Result<Message, GeneratorError> {
            self.seen.lock().unwrap().push((
                tools.iter().map(|t| t.name.clone()).collect(),
                tool_choice.map(str::to_string),
            ));
            Ok(Message::assistant("done"))
        }
    }

    #[tokio::test]
    async fn bound_generator_passes_tools_and_choice() {
        let model = Arc::new(RecordingModel {
            seen: Mutex::new(Vec::new()),
        });
        let generator = BoundGenerator::new(
            model.clone(),
            vec![ToolSchema::new("Respond", "", json!({}))],
        )
        .with_tool_choice(Some("Respond".to_string()));

        let message = generator.generate(&[Message::user("hi")]).await.unwrap();
        assert_eq!(message.content, "done");

        let seen = model.seen.lock().unwrap();
        assert_eq!(seen[0].0, vec!["Respond".to_string()]);
        assert_eq!(seen[0].1.as_deref(), Some("Respond"));
    }

    #[tokio::test]
    async fn fn_generator_calls_closure() {
        let generator = FnGenerator::new(|messages: &[Message]| {
            Ok(Message::assistant(format!("{} messages", messages.len())))
        });
        let message = generator
            .generate(&[Message::user("a"), Message::user("b")])
            .await
            .unwrap();
        assert_eq!(message.content, "2 messages");
    }
}
