//! Chat model configuration from TOML (`[model]` section)

use serde::{Deserialize, Serialize};
use toolmend_domain::{ConfigIssue, ConfigIssueCode};

/// Default OpenAI-compatible endpoint
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
/// Default environment variable holding the API key
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Raw chat model configuration from TOML
///
/// # Example
///
/// ```toml
/// [model]
/// base_url = "http://localhost:11434/v1"
/// model = "llama3.1"
/// api_key_env = "OLLAMA_API_KEY"
/// timeout_secs = 120
/// temperature = 0.0
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Base URL of an OpenAI-compatible chat completions API
    pub base_url: String,
    /// Model name sent with each request
    pub model: Option<String>,
    /// Name of the environment variable that holds the API key
    pub api_key_env: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Sampling temperature
    pub temperature: Option<f32>,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            timeout_secs: 60,
            temperature: None,
        }
    }
}

impl FileModelConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroValue {
                    field: "model.timeout_secs".to_string(),
                },
                "model.timeout_secs cannot be 0",
            ));
        }

        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue {
                    field: "model.base_url".to_string(),
                },
                "model.base_url cannot be empty",
            ));
        }

        if let Some(name) = &self.model
            && name.trim().is_empty()
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::EmptyValue {
                    field: "model.model".to_string(),
                },
                "model.model is empty; requests will fail without a model name",
            ));
        }

        if let Some(t) = self.temperature
            && !(0.0..=2.0).contains(&t)
        {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::OutOfRange {
                    field: "model.temperature".to_string(),
                },
                format!("model.temperature {} is outside 0.0..=2.0", t),
            ));
        }

        issues
    }
}
