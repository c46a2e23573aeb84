//! Validator step: checks a candidate message's tool calls against the
//! bound tool set.
//!
//! [`ToolCallValidation`] never mutates its input. For every call it looks
//! up the schema by name and runs the configured [`ToolValidator`]; the
//! resulting [`ValidationReport`] renders into error-report messages with
//! the configured [`ErrorFormatter`].

pub mod formatter;
pub mod report;

pub use formatter::{DefaultErrorFormatter, ErrorFormatter, PatchErrorFormatter};
pub use report::{CallOutcome, ToolCallError, ValidationReport};

use crate::conversation::message::Message;
use crate::tool::entities::ToolSet;
use crate::tool::traits::ToolValidator;
use crate::util::preview;
use std::sync::Arc;
use tracing::debug;

/// Schema check over all tool calls of one message.
#[derive(Clone)]
pub struct ToolCallValidation {
    tools: ToolSet,
    validator: Arc<dyn ToolValidator>,
    formatter: Arc<dyn ErrorFormatter>,
}

impl ToolCallValidation {
    pub fn new(tools: ToolSet, validator: Arc<dyn ToolValidator>) -> Self {
        Self {
            tools,
            validator,
            formatter: Arc::new(DefaultErrorFormatter),
        }
    }

    /// Replace the default error formatter.
    pub fn with_formatter(mut self, formatter: Arc<dyn ErrorFormatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn tools(&self) -> &ToolSet {
        &self.tools
    }

    /// Validate every tool call of `candidate`.
    pub fn validate(&self, candidate: &Message) -> ValidationReport {
        let outcomes = candidate
            .tool_calls
            .iter()
            .map(|call| match self.tools.get(&call.name) {
                None => {
                    debug!("Tool call {} names unknown tool '{}'", call.id, call.name);
                    CallOutcome::Invalid(ToolCallError {
                        tool_call: call.clone(),
                        error: format!("Unrecognized tool name: {}", call.name),
                        schema: None,
                    })
                }
                Some(schema) => match self.validator.validate(call, schema) {
                    Ok(()) => CallOutcome::Valid(call.clone()),
                    Err(error) => {
                        debug!(
                            "Tool call {} ({}) failed validation: {}",
                            call.id,
                            call.name,
                            preview(&error, 200)
                        );
                        CallOutcome::Invalid(ToolCallError {
                            tool_call: call.clone(),
                            error,
                            schema: Some(schema.clone()),
                        })
                    }
                },
            })
            .collect();
        ValidationReport::new(outcomes)
    }

    /// Error-report messages for `report`; empty on success.
    pub fn error_messages(&self, report: &ValidationReport) -> Vec<Message> {
        report.to_messages(self.formatter.as_ref(), &self.tools.names())
    }
}

impl std::fmt::Debug for ToolCallValidation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolCallValidation")
            .field("tools", &self.tools.names())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::{ToolCall, ToolSchema};
    use crate::tool::traits::DefaultToolValidator;
    use serde_json::json;

    fn validation() -> ToolCallValidation {
        let tools = ToolSet::new().register(ToolSchema::new(
            "Respond",
            "",
            json!({"type": "object", "required": ["answer"]}),
        ));
        ToolCallValidation::new(tools, Arc::new(DefaultToolValidator))
    }

    #[test]
    fn valid_calls_pass() {
        let candidate = Message::assistant("")
            .with_tool_call(ToolCall::new("c1", "Respond").with_arg("answer", "ok"));
        let report = validation().validate(&candidate);
        assert!(report.is_success());
        assert!(validation().error_messages(&report).is_empty());
    }

    #[test]
    fn each_failing_call_gets_one_error_message() {
        let candidate = Message::assistant("")
            .with_tool_call(ToolCall::new("c1", "Respond"))
            .with_tool_call(ToolCall::new("c2", "Nope"));
        let step = validation();
        let report = step.validate(&candidate);
        assert_eq!(report.errors().count(), 2);

        let messages = step.error_messages(&report);
        assert_eq!(messages.len(), 2);
        assert!(messages.iter().all(|m| m.is_error));
        assert!(messages[0].content.contains("Missing required parameter 'answer'"));
        assert!(messages[1].content.contains("Unrecognized tool name: \"Nope\""));
    }

    #[test]
    fn custom_formatter_is_used() {
        let step = validation().with_formatter(Arc::new(PatchErrorFormatter));
        let candidate = Message::assistant("").with_tool_call(ToolCall::new("c1", "Respond"));
        let messages = step.error_messages(&step.validate(&candidate));
        assert!(messages[0].content.contains("tool_call_id=[c1]"));
    }

    #[test]
    fn validation_does_not_mutate_candidate() {
        let candidate = Message::assistant("").with_tool_call(ToolCall::new("c1", "Respond"));
        let before = candidate.clone();
        let _ = validation().validate(&candidate);
        assert_eq!(candidate, before);
    }
}
