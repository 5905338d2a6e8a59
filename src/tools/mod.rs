//! Tool definitions and registry.
//!
//! Tools are registered once at startup into a read-only registry
//! shared across requests. Tool failures never cross the loop boundary
//! as errors; they are captured as `ToolResult` data so the model can
//! see the failure text on the next turn.

mod github;

pub use github::{
    CommentOnPullRequest, GetPullRequest, GitHubClient, ListPullRequests,
};

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::llm::FunctionDeclaration;

/// Failure of a single tool invocation.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ToolError {
    /// Missing or malformed arguments, detected before any external call.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The downstream API answered with a non-success status.
    #[error("GitHub API error {status}: {message}")]
    Api { status: u16, message: String },

    /// The request could not be completed at the transport level.
    #[error("request failed: {0}")]
    Transport(String),
}

/// Outcome of a tool invocation, as data.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolResult {
    Success(Value),
    Error {
        status_code: Option<u16>,
        message: String,
    },
}

impl ToolResult {
    pub fn is_error(&self) -> bool {
        matches!(self, ToolResult::Error { .. })
    }

    /// Render the result as the text the model sees on the next turn.
    pub fn render_for_model(&self) -> String {
        match self {
            ToolResult::Success(payload) => {
                serde_json::to_string(payload).unwrap_or_else(|_| payload.to_string())
            }
            ToolResult::Error {
                status_code: Some(status),
                message,
            } => format!("Error {}: {}", status, message),
            ToolResult::Error {
                status_code: None,
                message,
            } => format!("Error: {}", message),
        }
    }
}

impl From<ToolError> for ToolResult {
    fn from(error: ToolError) -> Self {
        match error {
            ToolError::InvalidInput(message) => ToolResult::Error {
                status_code: None,
                message,
            },
            ToolError::Api { status, message } => ToolResult::Error {
                status_code: Some(status),
                message,
            },
            ToolError::Transport(message) => ToolResult::Error {
                status_code: None,
                message,
            },
        }
    }
}

/// A named external capability with a typed input schema.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique, stable identifier the model calls the tool by.
    fn name(&self) -> &str;

    /// Shown verbatim to the model to decide applicability.
    fn description(&self) -> &str;

    /// JSON Schema object describing the accepted arguments.
    fn input_schema(&self) -> Value;

    /// Validate the arguments and perform the call.
    async fn invoke(&self, args: Value) -> Result<Value, ToolError>;
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateName(String),
}

/// Read-only, insertion-ordered set of tools, resolved by exact name.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    by_name: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool at startup. Names must be unique.
    pub fn register(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let name = tool.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.by_name.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// All tools, in registration order.
    pub fn all(&self) -> &[Arc<dyn Tool>] {
        &self.tools
    }

    /// Look a tool up by exact name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.by_name.get(name).map(|&index| &self.tools[index])
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Project every tool into a model-facing function declaration.
    /// Pure and order-preserving: the same registry always yields the
    /// same declarations in the same order.
    pub fn function_declarations(&self) -> Vec<FunctionDeclaration> {
        self.tools
            .iter()
            .map(|tool| FunctionDeclaration {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                input_schema: tool.input_schema(),
            })
            .collect()
    }
}

/// Build the registry of GitHub tools the review agent ships with.
pub fn default_registry(github: Arc<GitHubClient>) -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ListPullRequests::new(github.clone())))?;
    registry.register(Arc::new(GetPullRequest::new(github.clone())))?;
    registry.register(Arc::new(CommentOnPullRequest::new(github)))?;
    Ok(registry)
}
