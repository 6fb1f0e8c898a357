//! OpenAI-compatible `chat/completions` client

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::ChatConfig;
use crate::utils::{AppError, ErrorCode};

/// Message in the upstream wire format
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireMessage {
    pub role: String,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<WireToolCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl WireMessage {
    pub fn text(role: &str, content: &str) -> Self {
        Self {
            role: role.to_string(),
            content: Some(content.to_string()),
            tool_calls: Vec::new(),
            tool_call_id: None,
        }
    }

    pub fn tool_result(call_id: &str, content: String) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content),
            tool_calls: Vec::new(),
            tool_call_id: Some(call_id.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireToolCall {
    pub id: String,
    #[serde(rename = "type", default = "function_kind")]
    pub kind: String,
    pub function: WireFunction,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WireFunction {
    pub name: String,
    /// JSON-encoded arguments, as sent by the model
    #[serde(default)]
    pub arguments: String,
}

fn function_kind() -> String {
    "function".to_string()
}

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [WireMessage],
    tools: &'a [Value],
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: WireMessage,
}

/// Something that answers a conversation with the next assistant message
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn complete(&self, messages: &[WireMessage], tools: &[Value])
    -> Result<WireMessage, AppError>;
}

/// Hosted chat-completions endpoint
pub struct OpenAiBackend {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    model: String,
}

impl OpenAiBackend {
    /// `None` when no API key is configured
    pub fn from_config(client: reqwest::Client, config: &ChatConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self {
            client,
            endpoint: format!("{}/chat/completions", config.api_url.trim_end_matches('/')),
            api_key,
            model: config.model.clone(),
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiBackend {
    async fn complete(
        &self,
        messages: &[WireMessage],
        tools: &[Value],
    ) -> Result<WireMessage, AppError> {
        let body = CompletionRequest {
            model: &self.model,
            messages,
            tools,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| upstream_failed(format!("Request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(%status, body = %text, "Chat upstream returned an error");
            return Err(upstream_failed(format!("Upstream returned {status}")));
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| upstream_failed(format!("Invalid upstream response: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message)
            .ok_or_else(|| upstream_failed("Upstream returned no choices".to_string()))
    }
}

fn upstream_failed(message: String) -> AppError {
    tracing::error!(error = %message, "Chat upstream failure");
    AppError::with_message(ErrorCode::ChatUpstreamFailed, message)
}
