//! Validation results for one candidate message.

use super::formatter::ErrorFormatter;
use crate::conversation::message::Message;
use crate::tool::entities::{ToolCall, ToolSchema};

/// A tool call that failed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolCallError {
    pub tool_call: ToolCall,
    /// Raw validation failure
    pub error: String,
    /// The schema the call was expected to satisfy; `None` when the tool
    /// name is not in the bound tool set.
    pub schema: Option<ToolSchema>,
}

/// Outcome of validating a single call.
#[derive(Debug, Clone, PartialEq)]
pub enum CallOutcome {
    Valid(ToolCall),
    Invalid(ToolCallError),
}

/// Per-call outcomes for one candidate, in call order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    outcomes: Vec<CallOutcome>,
}

impl ValidationReport {
    pub fn new(outcomes: Vec<CallOutcome>) -> Self {
        Self { outcomes }
    }

    pub fn outcomes(&self) -> &[CallOutcome] {
        &self.outcomes
    }

    pub fn is_success(&self) -> bool {
        self.errors().next().is_none()
    }

    pub fn errors(&self) -> impl Iterator<Item = &ToolCallError> {
        self.outcomes.iter().filter_map(|o| match o {
            CallOutcome::Invalid(e) => Some(e),
            CallOutcome::Valid(_) => None,
        })
    }

    /// Render the report as tool messages.
    ///
    /// Empty on success. Otherwise every call gets an answer: failing calls
    /// an error-flagged message with the formatted guidance, passing calls
    /// their validated arguments, so no call is left unanswered.
    pub fn to_messages(&self, formatter: &dyn ErrorFormatter, known_tools: &[&str]) -> Vec<Message> {
        if self.is_success() {
            return Vec::new();
        }
        self.outcomes
            .iter()
            .map(|outcome| match outcome {
                CallOutcome::Valid(call) => Message::tool(&call.id, call.args.to_string()),
                CallOutcome::Invalid(e) => {
                    let content = match &e.schema {
                        Some(schema) => formatter.format(&e.error, &e.tool_call, schema),
                        None => unrecognized_tool(&e.tool_call.name, known_tools),
                    };
                    Message::tool(&e.tool_call.id, content).as_error()
                }
            })
            .collect()
    }
}

fn unrecognized_tool(name: &str, known_tools: &[&str]) -> String {
    format!(
        "Unrecognized tool name: \"{}\". You only have access to the following tools: [{}]. \
         Please call a tool with the correct name.",
        name,
        known_tools.join(", ")
    )
}
