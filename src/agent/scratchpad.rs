//! Per-request history of tool calls and their results.

use crate::llm::{Message, ToolCallRequest};
use crate::tools::ToolResult;

/// Append-only log of (tool call, tool result) pairs, scoped to one
/// request and replayed into the model context on every iteration.
#[derive(Debug, Default)]
pub struct Scratchpad {
    entries: Vec<(ToolCallRequest, ToolResult)>,
}

impl Scratchpad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, call: ToolCallRequest, result: ToolResult) {
        self.entries.push((call, result));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(ToolCallRequest, ToolResult)] {
        &self.entries
    }

    /// Flatten the history into model messages, in insertion order.
    pub fn messages(&self) -> Vec<Message> {
        self.entries
            .iter()
            .flat_map(|(call, result)| {
                [
                    Message::ToolCallRequest(call.clone()),
                    Message::ToolCallResult {
                        id: call.id.clone(),
                        name: call.name.clone(),
                        result: result.clone(),
                    },
                ]
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(id: &str, name: &str) -> ToolCallRequest {
        ToolCallRequest {
            id: id.to_string(),
            name: name.to_string(),
            arguments: json!({"pr_number": 1}),
        }
    }

    #[test]
    fn starts_empty_and_grows_one_pair_at_a_time() {
        let mut scratchpad = Scratchpad::new();
        assert!(scratchpad.is_empty());

        scratchpad.push(call("c1", "github_pull_request"), ToolResult::Success(json!({})));
        assert_eq!(scratchpad.len(), 1);

        scratchpad.push(
            call("c2", "github_list_pull_request"),
            ToolResult::Success(json!({"count": 0})),
        );
        assert_eq!(scratchpad.len(), 2);
        assert_eq!(scratchpad.messages().len(), 4);
    }

    #[test]
    fn messages_interleave_calls_and_results_in_order() {
        let mut scratchpad = Scratchpad::new();
        scratchpad.push(call("c1", "github_pull_request"), ToolResult::Success(json!({})));

        let messages = scratchpad.messages();
        assert!(matches!(&messages[0], Message::ToolCallRequest(c) if c.id == "c1"));
        assert!(matches!(&messages[1], Message::ToolCallResult { id, .. } if id == "c1"));
    }

    #[test]
    fn error_payload_survives_the_round_trip() {
        let mut scratchpad = Scratchpad::new();
        let error = ToolResult::Error {
            status_code: Some(404),
            message: "Not Found: no pull request #99".to_string(),
        };
        scratchpad.push(call("c1", "github_pull_request"), error.clone());

        match &scratchpad.messages()[1] {
            Message::ToolCallResult { name, result, .. } => {
                assert_eq!(name, "github_pull_request");
                assert_eq!(result, &error);
                assert!(result
                    .render_for_model()
                    .contains("Not Found: no pull request #99"));
            }
            other => panic!("expected tool call result, got {:?}", other),
        }
    }
}
