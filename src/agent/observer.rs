//! Hooks into the agent loop.

use crate::llm::ToolCallRequest;
use crate::tools::ToolResult;

use super::parser::AgentStep;

/// Observer invoked synchronously at fixed points in the loop:
/// before each model invocation, after the response is classified,
/// and after a tool call has produced its result.
pub trait AgentObserver: Send + Sync {
    fn on_iteration_start(&self, iteration: usize) {
        let _ = iteration;
    }

    fn on_step(&self, step: &AgentStep) {
        let _ = step;
    }

    fn on_tool_result(&self, call: &ToolCallRequest, result: &ToolResult) {
        let _ = (call, result);
    }
}

/// Default observer reporting loop progress via `tracing`.
pub struct TracingObserver;

impl AgentObserver for TracingObserver {
    fn on_iteration_start(&self, iteration: usize) {
        tracing::debug!("agent iteration {}", iteration + 1);
    }

    fn on_step(&self, step: &AgentStep) {
        match step {
            AgentStep::FunctionCall(call) => {
                tracing::debug!(tool = %call.name, "model requested tool call");
            }
            AgentStep::FinalAnswer(_) => {
                tracing::debug!("model produced final answer");
            }
        }
    }

    fn on_tool_result(&self, call: &ToolCallRequest, result: &ToolResult) {
        if result.is_error() {
            tracing::warn!(tool = %call.name, "tool returned an error");
        }
    }
}
