use anyhow::{anyhow, Context};
use axum::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::AssistantConfig;

/// Seam for the completion API so services and tests can swap providers.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// One-shot chat completion: system instruction plus a single user
    /// message, returning the answer text.
    async fn complete(&self, system: &str, user: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

/// OpenAI-compatible `chat/completions` client. No request timeout is set;
/// a hung provider call hangs the caller.
pub struct OpenAiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl OpenAiClient {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(&self, system: &str, user: &str) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user.to_string(),
                },
            ],
            max_tokens: self.max_tokens,
        };

        debug!(model = %self.model, "sending completion request");
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("completion request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(%status, body = %body, "completion API returned an error");
            return Err(anyhow!("completion API returned {status}"));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .context("decode completion response")?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("completion response had no content"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_serializes_in_wire_shape() {
        let request = ChatRequest {
            model: "gpt-4o-mini".into(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "be brief".into(),
                },
                ChatMessage {
                    role: "user",
                    content: "how much salt?".into(),
                },
            ],
            max_tokens: 500,
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["model"], "gpt-4o-mini");
        assert_eq!(value["max_tokens"], 500);
        assert_eq!(value["messages"][0]["role"], "system");
        assert_eq!(value["messages"][1]["content"], "how much salt?");
    }

    #[test]
    fn response_content_is_the_first_choice() {
        let raw = serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "Use two pinches." }, "finish_reason": "stop" }
            ],
            "usage": { "prompt_tokens": 10, "completion_tokens": 4, "total_tokens": 14 }
        });
        let parsed: ChatResponse = serde_json::from_value(raw).expect("deserialize");
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .expect("content");
        assert_eq!(content, "Use two pinches.");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = OpenAiClient::new(&AssistantConfig {
            base_url: "https://api.openai.com/v1/".into(),
            api_key: "k".into(),
            model: "gpt-4o-mini".into(),
            max_tokens: 500,
        });
        assert_eq!(client.base_url, "https://api.openai.com/v1");
    }
}
