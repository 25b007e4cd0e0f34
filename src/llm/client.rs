//! OpenAI-compatible chat-completions client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::Serialize;
use tracing::debug;

use super::ChatMessage;
use super::ChatModel;
use crate::config::AppConfig;
use crate::errors::DocBotError;
use crate::errors::Result;

/// Client for `POST {endpoint}/chat/completions`
pub struct LlmService {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

impl LlmService {
    /// Build a client from the `[llm]` config section
    ///
    /// # Errors
    /// - Missing API key
    /// - HTTP client build errors
    pub fn new(config: &AppConfig) -> Result<Self> {
        if config.llm_key().trim().is_empty() {
            return Err(DocBotError::ConfigError(
                "LLM API key not set: configure llm.llm_key or OPENAI_API_KEY".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| DocBotError::HttpError(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.llm_endpoint().trim_end_matches('/').to_string(),
            api_key: config.llm_key().to_string(),
            model: config.llm_model().to_string(),
            temperature: config.llm.temperature,
            max_tokens: config.llm.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl ChatModel for LlmService {
    async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        let url = format!("{}/chat/completions", self.endpoint);
        debug!(
            "Calling chat completions: model={}, {} messages",
            self.model,
            messages.len()
        );

        let request = CompletionRequest {
            model: &self.model,
            messages,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| DocBotError::HttpError(format!("LLM request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(DocBotError::LlmError(format!(
                "LLM API error ({status}): {error_text}"
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| DocBotError::LlmError(format!("Failed to parse response: {e}")))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| DocBotError::LlmError("Response contained no message".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_key() {
        let config = AppConfig::default();
        assert!(matches!(
            LlmService::new(&config),
            Err(DocBotError::ConfigError(_))
        ));
    }

    #[test]
    fn test_new_uses_config() {
        let mut config = AppConfig::default();
        config.llm.llm_key = "sk-test".to_string();
        config.llm.llm_endpoint = "http://localhost:8080/v1/".to_string();

        let service = LlmService::new(&config).unwrap();
        assert_eq!(service.model(), "gpt-3.5-turbo");
        assert_eq!(service.endpoint, "http://localhost:8080/v1");
        assert_eq!(service.temperature, 0.0);
    }

    #[test]
    fn test_request_omits_unset_max_tokens() {
        let messages = [ChatMessage::user("hi")];
        let request = CompletionRequest {
            model: "gpt-3.5-turbo",
            messages: &messages,
            temperature: 0.0,
            max_tokens: None,
        };

        let json = serde_json::to_value(&request).unwrap();
        assert!(json.get("max_tokens").is_none());
        assert_eq!(json["messages"][0]["role"], "user");
    }

    #[test]
    fn test_response_parsing() {
        let body = r#"{"choices":[{"index":0,"message":{"role":"assistant","content":"42"}}]}"#;
        let parsed: CompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.choices[0].message.content.as_deref(), Some("42"));
    }

    #[tokio::test]
    #[ignore = "Requires API key"]
    async fn test_live_completion() {
        let config = AppConfig::load().unwrap();
        let service = LlmService::new(&config).unwrap();
        let reply = service
            .chat(&[ChatMessage::user("Reply with the single word: pong")])
            .await
            .unwrap();
        assert!(!reply.is_empty());
    }
}
