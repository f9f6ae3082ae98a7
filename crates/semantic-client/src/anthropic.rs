use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::usage::{Usage, UsageCounters};
use crate::{SemanticClient, SemanticError};

#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    pub api_key: String,
    pub model: String,
    pub api_base: String,
    pub max_tokens: u32,
    pub timeout: Duration,
}

impl AnthropicConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            api_base: "https://api.anthropic.com/v1".to_string(),
            max_tokens: 1024,
            timeout: Duration::from_secs(60),
        }
    }
}

/// Messages-API client. Retry decisions belong to the caller's RetryGate;
/// this client only classifies what the wire gave back.
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
    usage: UsageCounters,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self, SemanticError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|err| SemanticError::Fatal(format!("failed to build HTTP client: {err}")))?;
        Ok(Self {
            client,
            config,
            usage: UsageCounters::default(),
        })
    }
}

#[async_trait]
impl SemanticClient for AnthropicClient {
    async fn send(&self, prompt: &str, context: &str) -> Result<String, SemanticError> {
        let body = MessagesRequest {
            model: self.config.model.clone(),
            max_tokens: self.config.max_tokens,
            system: prompt.to_string(),
            messages: vec![Message {
                role: "user".to_string(),
                content: vec![Content {
                    _type: "text".to_string(),
                    text: context.to_string(),
                }],
            }],
        };

        let url = format!("{}/messages", self.config.api_base.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .json(&body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    SemanticError::Timeout
                } else {
                    SemanticError::Transient(format!("request failed: {err}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "<response unavailable>".to_string());
            return Err(classify_status(status, text));
        }

        let response: MessagesResponse = response
            .json()
            .await
            .map_err(|err| SemanticError::Transient(format!("response invalid: {err}")))?;

        if let Some(usage) = &response.usage {
            self.usage.record(usage.input_tokens, usage.output_tokens);
            debug!(
                target: "semantic_client",
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "semantic call completed"
            );
        }

        let content = response
            .content
            .iter()
            .filter_map(|part| part.text.as_ref())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");

        if content.is_empty() {
            return Err(SemanticError::Transient("response missing content".into()));
        }
        Ok(content)
    }

    fn usage(&self) -> Usage {
        self.usage.snapshot()
    }
}

fn classify_status(status: StatusCode, body: String) -> SemanticError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => SemanticError::RateLimited,
        status if status.is_server_error() => {
            SemanticError::Transient(format!("upstream returned {status}: {body}"))
        }
        status => SemanticError::Fatal(format!("upstream returned {status}: {body}")),
    }
}

#[derive(Debug, Serialize)]
struct MessagesRequest {
    model: String,
    max_tokens: u32,
    system: String,
    messages: Vec<Message>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    _type: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ResponseContent>,
    #[serde(default)]
    usage: Option<ResponseUsage>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(rename = "type")]
    _type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseUsage {
    #[serde(default)]
    input_tokens: u64,
    #[serde(default)]
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification_matches_policy() {
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            SemanticError::RateLimited
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, String::new()),
            SemanticError::Transient(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            SemanticError::Fatal(_)
        ));
    }

    #[test]
    fn response_text_parts_are_joined() {
        let raw = r#"{
            "content": [
                {"type": "text", "text": "{\"found\": true}"},
                {"type": "text", "text": "tail"}
            ],
            "usage": {"input_tokens": 10, "output_tokens": 4}
        }"#;
        let parsed: MessagesResponse = serde_json::from_str(raw).unwrap();
        let joined = parsed
            .content
            .iter()
            .filter_map(|part| part.text.as_ref())
            .cloned()
            .collect::<Vec<_>>()
            .join("\n");
        assert!(joined.contains("found"));
        assert!(joined.ends_with("tail"));
    }
}
