//! Core agent loop implementation.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use thiserror::Error;

use crate::llm::{FunctionDeclaration, LlmClient, LlmError, Message};
use crate::tools::{ToolRegistry, ToolResult};

use super::observer::{AgentObserver, TracingObserver};
use super::parser::{self, AgentStep, ParseError};
use super::prompt::build_system_prompt;
use super::scratchpad::Scratchpad;

/// Request-level failures of a run. Tool failures are not here: they
/// are captured as scratchpad data and fed back to the model.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("model requested unknown tool: {0}")]
    UnknownTool(String),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("agent did not produce a final answer within {0} iterations")]
    IterationLimitExceeded(usize),
}

/// One entry in the per-request execution log.
#[derive(Debug, Clone, Serialize)]
pub struct RunLogEntry {
    /// Timestamp (RFC 3339)
    pub timestamp: String,
    pub kind: RunLogKind,
    pub content: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunLogKind {
    ToolCall,
    ToolResult,
    Response,
}

/// Outcome of a completed run.
#[derive(Debug)]
pub struct AgentRun {
    /// The model's final answer.
    pub output: String,
    /// Model invocations performed, including the final one.
    pub iterations: usize,
    /// Execution log, one entry per tool call, tool result, and response.
    pub log: Vec<RunLogEntry>,
}

/// Owns one request's loop: invoke the model, classify the response,
/// dispatch tool calls, and repeat until a final answer or a bounded
/// failure.
pub struct AgentExecutor {
    llm: Arc<dyn LlmClient>,
    tools: Arc<ToolRegistry>,
    observer: Arc<dyn AgentObserver>,
    model: String,
    max_iterations: usize,
}

impl AgentExecutor {
    pub fn new(
        llm: Arc<dyn LlmClient>,
        tools: Arc<ToolRegistry>,
        model: String,
        max_iterations: usize,
    ) -> Self {
        Self {
            llm,
            tools,
            observer: Arc::new(TracingObserver),
            model,
            max_iterations,
        }
    }

    /// Replace the default tracing observer.
    pub fn with_observer(mut self, observer: Arc<dyn AgentObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Run the loop for one user input.
    pub async fn run(&self, input: &str) -> Result<AgentRun, AgentError> {
        let system_prompt = build_system_prompt(self.tools.as_ref());
        let declarations: Vec<FunctionDeclaration> = self.tools.function_declarations();
        let base = [
            Message::System(system_prompt),
            Message::Human(input.to_string()),
        ];

        let mut scratchpad = Scratchpad::new();
        let mut log = Vec::new();

        for iteration in 0..self.max_iterations {
            self.observer.on_iteration_start(iteration);

            let mut messages = base.to_vec();
            messages.extend(scratchpad.messages());

            let response = self
                .llm
                .chat_completion(&self.model, &messages, Some(&declarations))
                .await?;

            let step = parser::parse(&response)?;
            self.observer.on_step(&step);

            match step {
                AgentStep::FinalAnswer(output) => {
                    log.push(log_entry(RunLogKind::Response, truncate(&output, 2000)));
                    return Ok(AgentRun {
                        output,
                        iterations: iteration + 1,
                        log,
                    });
                }
                AgentStep::FunctionCall(call) => {
                    log.push(log_entry(
                        RunLogKind::ToolCall,
                        format!("{} {}", call.name, call.arguments),
                    ));

                    let tool = self
                        .tools
                        .get(&call.name)
                        .ok_or_else(|| AgentError::UnknownTool(call.name.clone()))?;

                    // One invocation per model decision; errors become
                    // data the model sees on the next turn.
                    let result = match tool.invoke(call.arguments.clone()).await {
                        Ok(payload) => ToolResult::Success(payload),
                        Err(error) => ToolResult::from(error),
                    };

                    self.observer.on_tool_result(&call, &result);
                    log.push(log_entry(
                        RunLogKind::ToolResult,
                        truncate(&result.render_for_model(), 1000),
                    ));

                    scratchpad.push(call, result);
                }
            }
        }

        Err(AgentError::IterationLimitExceeded(self.max_iterations))
    }
}

fn log_entry(kind: RunLogKind, content: String) -> RunLogEntry {
    RunLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        kind,
        content,
    }
}

/// Truncate a string for logging purposes, respecting char boundaries.
fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... [truncated]", &s[..end])
}
