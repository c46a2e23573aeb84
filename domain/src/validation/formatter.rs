//! Error formatters: turn a raw validation failure into correction guidance.

use crate::tool::entities::{ToolCall, ToolSchema};

/// Formats a failed validation into the text shown to the generator.
pub trait ErrorFormatter: Send + Sync {
    fn format(&self, error: &str, call: &ToolCall, schema: &ToolSchema) -> String;
}

/// Generic guidance: the error followed by a request to fix it.
#[derive(Debug, Clone, Default)]
pub struct DefaultErrorFormatter;

impl ErrorFormatter for DefaultErrorFormatter {
    fn format(&self, error: &str, _call: &ToolCall, _schema: &ToolSchema) -> String {
        format!("{}\n\nRespond after fixing all validation errors.", error)
    }
}

/// Asks for a JSONPatch against the failing call instead of a full retry.
#[derive(Debug, Clone, Default)]
pub struct PatchErrorFormatter;

impl ErrorFormatter for PatchErrorFormatter {
    fn format(&self, error: &str, call: &ToolCall, schema: &ToolSchema) -> String {
        format!(
            "Error:\n\n```\n{}\n```\nExpected Parameter Schema:\n\n```json\n{}\n```\n\
             Please respond with a JSONPatch to correct the error for tool_call_id=[{}].",
            error,
            schema.parameters_json(),
            call.id
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn default_formatter_appends_instruction() {
        let text = DefaultErrorFormatter.format(
            "answer is required",
            &ToolCall::new("c1", "Respond"),
            &ToolSchema::new("Respond", "", json!({})),
        );
        assert_eq!(
            text,
            "answer is required\n\nRespond after fixing all validation errors."
        );
    }

    #[test]
    fn patch_formatter_names_the_call_and_schema() {
        let schema = ToolSchema::new(
            "Respond",
            "",
            json!({"type": "object", "required": ["answer"]}),
        );
        let text = PatchErrorFormatter.format("boom", &ToolCall::new("call_7", "Respond"), &schema);
        assert!(text.starts_with("Error:\n\n```\nboom\n```"));
        assert!(text.contains("\"required\""));
        assert!(text.ends_with("tool_call_id=[call_7]."));
    }
}
