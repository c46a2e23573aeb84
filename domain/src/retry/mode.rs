//! Retry mode: which correction strategy the loop uses.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How failed tool calls are corrected.
///
/// - **Plain** (default): the generator re-emits the whole call and the most
///   recent answer wins.
/// - **JsonPatch**: the generator answers with JSONPatch operations against
///   the failing call, merged cumulatively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RetryMode {
    #[default]
    Plain,
    JsonPatch,
}

impl RetryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetryMode::Plain => "plain",
            RetryMode::JsonPatch => "jsonpatch",
        }
    }
}

impl fmt::Display for RetryMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RetryMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" | "default" => Ok(RetryMode::Plain),
            "jsonpatch" | "json-patch" | "patch" => Ok(RetryMode::JsonPatch),
            _ => Err(format!(
                "Invalid retry mode: {}. Valid options: plain, jsonpatch",
                s
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_plain() {
        assert_eq!(RetryMode::default(), RetryMode::Plain);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("plain".parse::<RetryMode>().unwrap(), RetryMode::Plain);
        assert_eq!("JSONPatch".parse::<RetryMode>().unwrap(), RetryMode::JsonPatch);
        assert_eq!("patch".parse::<RetryMode>().unwrap(), RetryMode::JsonPatch);
        assert!("other".parse::<RetryMode>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(serde_json::to_string(&RetryMode::JsonPatch).unwrap(), "\"jsonpatch\"");
        let mode: RetryMode = serde_json::from_str("\"plain\"").unwrap();
        assert_eq!(mode, RetryMode::Plain);
    }
}
