//! Anthropic Messages API client.
//!
//! Wraps one chat-completion call per invocation. Tool calls arrive as
//! `tool_use` content blocks and tool results are sent back as
//! `tool_result` blocks on a user message, per the Messages API shape.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::Config;

use super::{ContentBlock, FunctionDeclaration, LlmClient, LlmError, Message, ModelResponse};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";

/// Client for the Anthropic Messages API.
pub struct AnthropicClient {
    http: reqwest::Client,
    api_key: String,
    max_tokens: u32,
    temperature: f32,
}

impl AnthropicClient {
    /// Build a client from the service configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.model_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            api_key: config.anthropic_api_key.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[FunctionDeclaration]>,
    ) -> Result<ModelResponse, LlmError> {
        let (system, wire_messages) = split_messages(messages);

        let request = MessagesRequest {
            model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            system,
            messages: wire_messages,
            tools,
        };

        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Unavailable("model request timed out".to_string())
                } else {
                    LlmError::Unavailable(format!("model request failed: {}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Unavailable(format!(
                "provider returned {}: {}",
                status, body
            )));
        }

        let decoded: MessagesResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Protocol(format!("undecodable provider response: {}", e)))?;

        Ok(convert_response(decoded))
    }
}

// ── Wire types ────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<WireMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [FunctionDeclaration]>,
}

#[derive(Debug, Serialize)]
struct WireMessage {
    role: &'static str,
    content: WireContent,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum WireContent {
    Text(String),
    Blocks(Vec<WireBlock>),
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum WireBlock {
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
    ToolResult {
        tool_use_id: String,
        content: String,
        is_error: bool,
    },
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ResponseBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ResponseBlock {
    Text { text: String },
    ToolUse { id: String, name: String, input: Value },
    Thinking { thinking: String },
}

/// Map the context messages to the provider wire shape. The system
/// prompt travels in its own top-level field.
fn split_messages(messages: &[Message]) -> (Option<String>, Vec<WireMessage>) {
    let mut system = None;
    let mut wire = Vec::new();

    for message in messages {
        match message {
            Message::System(text) => system = Some(text.clone()),
            Message::Human(text) => wire.push(WireMessage {
                role: "user",
                content: WireContent::Text(text.clone()),
            }),
            Message::ToolCallRequest(call) => wire.push(WireMessage {
                role: "assistant",
                content: WireContent::Blocks(vec![WireBlock::ToolUse {
                    id: call.id.clone(),
                    name: call.name.clone(),
                    input: call.arguments.clone(),
                }]),
            }),
            Message::ToolCallResult { id, result, .. } => wire.push(WireMessage {
                role: "user",
                content: WireContent::Blocks(vec![WireBlock::ToolResult {
                    tool_use_id: id.clone(),
                    content: result.render_for_model(),
                    is_error: result.is_error(),
                }]),
            }),
        }
    }

    (system, wire)
}

fn convert_response(decoded: MessagesResponse) -> ModelResponse {
    let content = decoded
        .content
        .into_iter()
        .filter_map(|block| match block {
            ResponseBlock::Text { text } => Some(ContentBlock::Text(text)),
            ResponseBlock::ToolUse { id, name, input } => {
                Some(ContentBlock::ToolUse { id, name, input })
            }
            ResponseBlock::Thinking { .. } => None,
        })
        .collect();

    ModelResponse { content }
}
