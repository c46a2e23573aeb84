//! Raw TOML configuration data types
//!
//! These structs represent the exact structure of the TOML config file.
//! They are deserialized directly and converted into application types
//! with issue collection rather than hard failure.

mod logging;
mod model;
mod retry;

pub use logging::FileLoggingConfig;
pub use model::{DEFAULT_API_KEY_ENV, DEFAULT_BASE_URL, FileModelConfig};
pub use retry::FileRetryConfig;

use super::error::ConfigError;
use serde::{Deserialize, Serialize};
use toolmend_domain::ConfigIssue;

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Retry loop settings
    pub retry: FileRetryConfig,
    /// Chat model endpoint settings
    pub model: FileModelConfig,
    /// Conversation log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        issues.extend(self.retry.to_retry_params().1);
        issues.extend(self.model.validate());
        issues
    }

    /// Validate, failing on any error-severity issue.
    ///
    /// Returns the remaining warnings on success.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(|i| i.is_error());
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigError::Invalid(
                errors.into_iter().map(|i| i.message).collect(),
            ))
        }
    }
}
