//! Agent module - the core review agent logic.
//!
//! The agent follows a "tools in a loop" pattern:
//! 1. Build context with the review persona prompt and user query
//! 2. Call the model with the available GitHub tools
//! 3. Classify the response: tool call or final answer
//! 4. On a tool call, execute it, append call and result to the
//!    scratchpad, and repeat until a final answer or the iteration cap

mod executor;
mod observer;
mod parser;
mod prompt;
mod scratchpad;

pub use executor::{AgentError, AgentExecutor, AgentRun, RunLogEntry, RunLogKind};
pub use observer::{AgentObserver, TracingObserver};
pub use parser::{parse, AgentStep, ParseError};
pub use prompt::{build_system_prompt, CODE_FEEDBACK_PROMPT};
pub use scratchpad::Scratchpad;
