//! Retry loop configuration from TOML (`[retry]` section)

use serde::{Deserialize, Serialize};
use toolmend_application::{DEFAULT_MAX_ATTEMPTS, RetryParams};
use toolmend_domain::{ConfigIssue, ConfigIssueCode, RetryMode};

/// Raw retry configuration from TOML
///
/// # Example
///
/// ```toml
/// [retry]
/// max_attempts = 5
/// mode = "jsonpatch"       # or "plain"
/// tool_choice = "Respond"  # optional forced tool
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileRetryConfig {
    /// Hard cap on generation attempts
    pub max_attempts: usize,
    /// Correction strategy name
    pub mode: String,
    /// Forced tool choice
    pub tool_choice: Option<String>,
}

impl Default for FileRetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            mode: RetryMode::default().as_str().to_string(),
            tool_choice: None,
        }
    }
}

impl FileRetryConfig {
    /// Parse the mode string, collecting an issue for unknown values.
    pub fn parse_mode(&self) -> (RetryMode, Vec<ConfigIssue>) {
        match self.mode.parse::<RetryMode>() {
            Ok(mode) => (mode, Vec::new()),
            Err(_) => (
                RetryMode::default(),
                vec![ConfigIssue::error(
                    ConfigIssueCode::InvalidEnumValue {
                        field: "retry.mode".to_string(),
                        value: self.mode.clone(),
                        valid_values: vec!["plain".to_string(), "jsonpatch".to_string()],
                    },
                    format!("retry.mode: unknown value '{}'", self.mode),
                )],
            ),
        }
    }

    /// Convert to application-level [`RetryParams`].
    pub fn to_retry_params(&self) -> (RetryParams, Vec<ConfigIssue>) {
        let mut issues = Vec::new();

        if self.max_attempts == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "retry.max_attempts".to_string(),
                },
                "retry.max_attempts must be at least 1",
            ));
        }

        let tool_choice = match self.tool_choice.as_deref().map(str::trim) {
            Some("") => {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::EmptyValue {
                        field: "retry.tool_choice".to_string(),
                    },
                    "retry.tool_choice cannot be empty; omit it instead",
                ));
                None
            }
            other => other.map(str::to_string),
        };

        let (mode, mode_issues) = self.parse_mode();
        issues.extend(mode_issues);

        let params = RetryParams {
            max_attempts: self.max_attempts,
            tool_choice,
            mode,
        };
        (params, issues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_retry_params() {
        let (params, issues) = FileRetryConfig::default().to_retry_params();
        assert!(issues.is_empty());
        assert_eq!(params, RetryParams::default());
    }

    #[test]
    fn test_parse_jsonpatch_mode() {
        let config = FileRetryConfig {
            mode: "jsonpatch".to_string(),
            ..Default::default()
        };
        assert_eq!(config.parse_mode().0, RetryMode::JsonPatch);
    }

    #[test]
    fn test_invalid_values_are_reported() {
        let config = FileRetryConfig {
            max_attempts: 0,
            mode: "sometimes".to_string(),
            tool_choice: Some("  ".to_string()),
        };
        let (params, issues) = config.to_retry_params();
        assert_eq!(issues.len(), 3);
        assert!(issues.iter().all(|i| i.is_error()));
        assert_eq!(params.mode, RetryMode::Plain);
        assert!(params.tool_choice.is_none());
    }
}
