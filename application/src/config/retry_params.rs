//! Retry parameters: loop control for the validated generation use case.

use serde::{Deserialize, Serialize};
use toolmend_domain::RetryMode;

/// Default cap on generation attempts.
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;

/// Static parameters controlling one retry loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryParams {
    /// Hard cap on generation attempts (primary and fallback alike).
    pub max_attempts: usize,
    /// Forced tool choice; when set, validation always runs.
    pub tool_choice: Option<String>,
    /// Correction strategy.
    pub mode: RetryMode,
}

impl Default for RetryParams {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            tool_choice: None,
            mode: RetryMode::default(),
        }
    }
}

impl RetryParams {
    pub fn with_max_attempts(mut self, max: usize) -> Self {
        self.max_attempts = max;
        self
    }

    pub fn with_tool_choice(mut self, tool_choice: impl Into<String>) -> Self {
        self.tool_choice = Some(tool_choice.into());
        self
    }

    pub fn with_mode(mut self, mode: RetryMode) -> Self {
        self.mode = mode;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = RetryParams::default();
        assert_eq!(params.max_attempts, 3);
        assert!(params.tool_choice.is_none());
        assert_eq!(params.mode, RetryMode::Plain);
    }

    #[test]
    fn test_builder_methods() {
        let params = RetryParams::default()
            .with_max_attempts(5)
            .with_tool_choice("Respond")
            .with_mode(RetryMode::JsonPatch);
        assert_eq!(params.max_attempts, 5);
        assert_eq!(params.tool_choice.as_deref(), Some("Respond"));
        assert_eq!(params.mode, RetryMode::JsonPatch);
    }
}
