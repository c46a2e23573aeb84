//! Logging configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
///
/// ```toml
/// [logging]
/// conversation_log = "~/.local/state/toolmend/last.jsonl"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL file receiving the retry-loop transcript
    pub conversation_log: Option<PathBuf>,
}

impl FileLoggingConfig {
    /// Conversation log path with a leading `~/` expanded.
    pub fn conversation_log_path(&self) -> Option<PathBuf> {
        let path = self.conversation_log.as_ref()?;
        match path.strip_prefix("~") {
            Ok(rest) => dirs::home_dir().map(|home| home.join(rest)),
            Err(_) => Some(path.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_path_is_unchanged() {
        let config = FileLoggingConfig {
            conversation_log: Some(PathBuf::from("/tmp/log.jsonl")),
        };
        assert_eq!(
            config.conversation_log_path(),
            Some(PathBuf::from("/tmp/log.jsonl"))
        );
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = FileLoggingConfig {
            conversation_log: Some(PathBuf::from("~/logs/run.jsonl")),
        };
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                config.conversation_log_path(),
                Some(home.join("logs/run.jsonl"))
            );
        }
    }

    #[test]
    fn test_unset_is_none() {
        assert!(FileLoggingConfig::default().conversation_log_path().is_none());
    }
}
