//! OpenAI-compatible chat model over HTTP.
//!
//! Talks to any server implementing `POST {base_url}/chat/completions`
//! with function tools (OpenAI, vLLM, Ollama, llama.cpp server).

mod convert;
mod types;

use async_trait::async_trait;
use std::time::Duration;
use toolmend_application::{ChatModel, GeneratorError};
use toolmend_domain::{Message, ToolSchema};
use tracing::{debug, instrument};

use crate::config::FileModelConfig;

/// Connection settings for [`OpenAiChatModel`].
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub temperature: Option<f32>,
}

impl OpenAiConfig {
    /// Build from the `[model]` config section, reading the API key from
    /// the environment variable it names.
    pub fn from_file_config(config: &FileModelConfig) -> Result<Self, GeneratorError> {
        let model = config
            .model
            .clone()
            .filter(|m| !m.trim().is_empty())
            .ok_or_else(|| GeneratorError::Other("model.model is not configured".to_string()))?;
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.is_empty());
        if api_key.is_none() {
            debug!("{} is not set; sending requests without authorization", config.api_key_env);
        }
        Ok(Self {
            base_url: config.base_url.clone(),
            model,
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
            temperature: config.temperature,
        })
    }
}

/// [`ChatModel`] backed by the Chat Completions API.
#[derive(Debug)]
pub struct OpenAiChatModel {
    config: OpenAiConfig,
    client: reqwest::Client,
}

impl OpenAiChatModel {
    pub fn new(config: OpenAiConfig) -> Result<Self, GeneratorError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GeneratorError::Other(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip_all, fields(model = %self.config.model))]
    async fn generate(
        &self,
        messages: &[Message],
        tools: &[ToolSchema],
        tool_choice: Option<&str>,
    ) -> Result<Message, GeneratorError> {
        let body = convert::build_request(
            &self.config.model,
            self.config.temperature,
            messages,
            tools,
            tool_choice,
        );

        let mut request = self.client.post(self.completions_url()).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                GeneratorError::Timeout
            } else {
                GeneratorError::RequestFailed(e.to_string())
            }
        })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GeneratorError::RequestFailed(format!("failed to read response body: {}", e)))?;
        if !status.is_success() {
            return Err(GeneratorError::RequestFailed(convert::error_message(
                status.as_u16(),
                &text,
            )));
        }

        let parsed: types::Response = serde_json::from_str(&text)
            .map_err(|e| GeneratorError::InvalidResponse(format!("failed to parse response: {}", e)))?;
        let message = convert::convert_response(parsed)?;
        debug!("Received {} tool call(s)", message.tool_calls.len());
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_requires_model_name() {
        let err = OpenAiConfig::from_file_config(&FileModelConfig::default()).unwrap_err();
        assert!(matches!(err, GeneratorError::Other(_)));
    }

    #[test]
    fn test_config_reads_settings() {
        let file = FileModelConfig {
            base_url: "http://localhost:8080/v1/".to_string(),
            model: Some("local".to_string()),
            api_key_env: "TOOLMEND_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            timeout_secs: 5,
            temperature: Some(0.0),
        };
        let config = OpenAiConfig::from_file_config(&file).unwrap();
        assert_eq!(config.model, "local");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(5));

        let model = OpenAiChatModel::new(config).unwrap();
        assert_eq!(model.completions_url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(model.name(), "local");
    }
}
