//! Chat completions client for OpenAI-compatible endpoints

use crate::config::LlmConfig;
use crate::error::{Result, ShortlisterError};
use log::{debug, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// First retry waits this long, doubling after each attempt
const BASE_BACKOFF_MS: u64 = 1000;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}

impl ChatResponse {
    /// Content of the first choice
    pub fn text(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|choice| choice.message.content.as_deref())
    }
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// One system + user exchange
#[derive(Debug, Clone)]
pub struct ChatPrompt<'a> {
    pub system: &'a str,
    pub user: &'a str,
    pub temperature: f64,
}

#[derive(Clone)]
pub struct ChatClient {
    client: Client,
    endpoint: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    max_retries: u32,
}

impl ChatClient {
    pub fn new(config: &LlmConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            max_retries: config.max_retries,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// The first request plus every retry
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Send one chat request and return the reply text.
    /// Retries on 429 and 5xx with exponential backoff.
    pub async fn complete(&self, prompt: &ChatPrompt<'_>) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt.user,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: prompt.temperature,
        };

        let mut last_error: Option<ShortlisterError> = None;

        for attempt in 0..self.max_attempts() {
            if attempt > 0 {
                let delay = backoff_delay(attempt);
                warn!(
                    "Chat request attempt {} failed, retrying after {}ms",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&self.endpoint)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await
            {
                Ok(response) => response,
                Err(e) => {
                    last_error = Some(e.into());
                    continue;
                }
            };

            let status = response.status();

            if status.as_u16() == 429 || status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Chat API returned {}: {}", status, body);
                last_error = Some(ShortlisterError::LlmApi {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(ShortlisterError::LlmApi {
                    status: status.as_u16(),
                    message: api_error_message(body),
                });
            }

            let chat: ChatResponse = response.json().await?;
            if let Some(usage) = &chat.usage {
                debug!(
                    "Chat request succeeded: prompt_tokens={}, completion_tokens={}",
                    usage.prompt_tokens, usage.completion_tokens
                );
            }

            return chat
                .text()
                .map(|text| text.trim().to_string())
                .ok_or_else(|| {
                    ShortlisterError::MalformedJudgment("Empty response from chat API".to_string())
                });
        }

        Err(last_error.unwrap_or_else(|| {
            ShortlisterError::Network(format!("No response after {} attempts", self.max_attempts()))
        }))
    }
}

/// 1s, 2s, 4s, ...
fn backoff_delay(attempt: u32) -> Duration {
    Duration::from_millis(BASE_BACKOFF_MS << (attempt.saturating_sub(1)).min(6))
}

/// `error.message` from an API error body, else the body itself
fn api_error_message(body: String) -> String {
    serde_json::from_str::<ApiError>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_doubles() {
        assert_eq!(backoff_delay(1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(2), Duration::from_millis(2000));
        assert_eq!(backoff_delay(3), Duration::from_millis(4000));
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error": {"message": "Incorrect API key provided", "type": "invalid_request_error"}}"#;
        assert_eq!(api_error_message(body.to_string()), "Incorrect API key provided");
        assert_eq!(api_error_message("gateway down".to_string()), "gateway down");
    }

    #[test]
    fn test_response_text() {
        let json = r#"{"choices": [{"message": {"role": "assistant", "content": "{\"a\": 1}"}}]}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.text(), Some("{\"a\": 1}"));
        assert!(response.usage.is_none());

        let empty: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn test_endpoint_from_base_url() {
        let mut config = LlmConfig::default();
        config.base_url = "http://localhost:8080/v1/".to_string();
        let client = ChatClient::new(&config, "key".to_string()).unwrap();
        assert_eq!(client.endpoint, "http://localhost:8080/v1/chat/completions");
        assert_eq!(client.model(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_retries_come_after_the_first_attempt() {
        let config = LlmConfig::default();
        let client = ChatClient::new(&config, "key".to_string()).unwrap();
        assert_eq!(config.max_retries, 3);
        assert_eq!(client.max_attempts(), 4);

        let no_retries = LlmConfig {
            max_retries: 0,
            ..LlmConfig::default()
        };
        let client = ChatClient::new(&no_retries, "key".to_string()).unwrap();
        assert_eq!(client.max_attempts(), 1);
    }
}
