//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Caller input is neither a message list nor a prompt value.
    #[error("Unexpected input format: {0}")]
    InputFormat(String),

    /// The aggregator was handed a message sequence without any assistant
    /// message. Every attempt appends one, so this is an orchestration bug.
    #[error("No assistant message found in the sequence")]
    NoAssistantMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_assistant_message_display() {
        assert_eq!(
            DomainError::NoAssistantMessage.to_string(),
            "No assistant message found in the sequence"
        );
    }

    #[test]
    fn test_input_format_display_names_the_shape() {
        let error = DomainError::InputFormat("number".to_string());
        assert_eq!(error.to_string(), "Unexpected input format: number");
    }
}
