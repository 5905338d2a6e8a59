//! Model provider integration.
//!
//! Defines the provider-agnostic message and response types the agent
//! loop works with, the `LlmClient` trait, and the Anthropic-backed
//! implementation.

mod anthropic;

pub use anthropic::AnthropicClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::tools::ToolResult;

/// Errors from a single model invocation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LlmError {
    /// Transport-level failure: network, auth, rate limit, or a
    /// non-success status from the provider.
    #[error("model provider unavailable: {0}")]
    Unavailable(String),

    /// The provider answered but the body could not be decoded.
    #[error("model provider protocol error: {0}")]
    Protocol(String),
}

/// A tool exposed to the model as a callable function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FunctionDeclaration {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A model-requested tool invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolCallRequest {
    /// Provider-assigned call id, echoed back with the result.
    pub id: String,
    pub name: String,
    pub arguments: Value,
}

/// One entry of the model context for a single request.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    System(String),
    Human(String),
    ToolCallRequest(ToolCallRequest),
    ToolCallResult {
        id: String,
        name: String,
        result: ToolResult,
    },
}

/// A decoded content block from the model.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentBlock {
    Text(String),
    ToolUse {
        id: String,
        name: String,
        input: Value,
    },
}

/// A decoded model response, ready for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResponse {
    pub content: Vec<ContentBlock>,
}

impl ModelResponse {
    /// Concatenate the text blocks of the response.
    pub fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text(text) => Some(text.as_str()),
                ContentBlock::ToolUse { .. } => None,
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// A stateless chat-completion client. One request, one response,
/// no internal retry.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn chat_completion(
        &self,
        model: &str,
        messages: &[Message],
        tools: Option<&[FunctionDeclaration]>,
    ) -> Result<ModelResponse, LlmError>;
}
