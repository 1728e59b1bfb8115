//! Minimal OpenAI-compatible chat completions client
//!
//! Both Perplexity and OpenRouter expose `/chat/completions` with the same
//! request and response shape, so one client serves both.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::CompletionConfig;

/// Errors that can occur when calling a completion API
#[derive(Debug, Error)]
pub enum CompletionError {
    /// HTTP request failed or returned an error status
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The response carried no message content
    #[error("Completion response had no content")]
    EmptyResponse,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for one completion endpoint
#[derive(Debug, Clone)]
pub struct CompletionClient {
    http_client: Client,
    config: CompletionConfig,
}

impl CompletionClient {
    pub fn new(config: CompletionConfig) -> Self {
        Self {
            http_client: Client::new(),
            config,
        }
    }

    /// Sends a system + user prompt and returns the first choice's text
    pub async fn complete(&self, system: &str, prompt: &str) -> Result<String, CompletionError> {
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
        };

        let response: ChatResponse = self
            .http_client
            .post(&self.config.url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(CompletionError::EmptyResponse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::json;

    fn test_client(server: &mockito::ServerGuard) -> CompletionClient {
        CompletionClient::new(CompletionConfig {
            url: format!("{}/chat/completions", server.url()),
            api_key: "test-key-123".to_string(),
            model: "sonar".to_string(),
        })
    }

    #[tokio::test]
    async fn test_complete_sends_bearer_key_and_returns_content() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/chat/completions")
            .match_header("authorization", "Bearer test-key-123")
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({"model": "sonar"})),
                Matcher::Regex("Test query".to_string()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(json!({"choices": [{"message": {"content": " AAPL\n"}}]}).to_string())
            .create_async()
            .await;

        let content = test_client(&server).complete("system", "Test query").await.unwrap();

        assert_eq!(content, "AAPL");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_complete_error_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_status(429)
            .create_async()
            .await;

        let result = test_client(&server).complete("system", "Test query").await;

        assert!(matches!(result, Err(CompletionError::RequestFailed(_))));
    }

    #[tokio::test]
    async fn test_complete_without_choices_is_empty() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/chat/completions")
            .with_header("content-type", "application/json")
            .with_body(json!({"choices": []}).to_string())
            .create_async()
            .await;

        let result = test_client(&server).complete("system", "Test query").await;

        assert!(matches!(result, Err(CompletionError::EmptyResponse)));
    }
}
