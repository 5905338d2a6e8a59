//! Classification of model responses into agent steps.

use thiserror::Error;

use crate::llm::{ContentBlock, ModelResponse, ToolCallRequest};

/// The classified outcome of one model turn.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentStep {
    FunctionCall(ToolCallRequest),
    FinalAnswer(String),
}

/// A structurally invalid model response.
#[derive(Debug, Clone, Error, PartialEq)]
#[error("unparseable model response: {0}")]
pub struct ParseError(pub String);

/// Classify a model response as either a function call or a final
/// answer. The first `tool_use` block wins; otherwise the concatenated
/// text is the answer. A response with neither is a parse error.
pub fn parse(response: &ModelResponse) -> Result<AgentStep, ParseError> {
    for block in &response.content {
        if let ContentBlock::ToolUse { id, name, input } = block {
            return Ok(AgentStep::FunctionCall(ToolCallRequest {
                id: id.clone(),
                name: name.clone(),
                arguments: input.clone(),
            }));
        }
    }

    let text = response.text();
    if text.trim().is_empty() {
        return Err(ParseError(
            "response contained neither a tool call nor text".to_string(),
        ));
    }

    Ok(AgentStep::FinalAnswer(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tool_use_block_classifies_as_function_call() {
        let response = ModelResponse {
            content: vec![ContentBlock::ToolUse {
                id: "c1".to_string(),
                name: "github_list_pull_request".to_string(),
                input: json!({"owner": "y", "repo_name": "x"}),
            }],
        };

        let step = parse(&response).unwrap();
        assert_eq!(
            step,
            AgentStep::FunctionCall(ToolCallRequest {
                id: "c1".to_string(),
                name: "github_list_pull_request".to_string(),
                arguments: json!({"owner": "y", "repo_name": "x"}),
            })
        );
    }

    #[test]
    fn first_tool_use_wins_over_text_and_later_calls() {
        let response = ModelResponse {
            content: vec![
                ContentBlock::Text("Let me look at the PRs.".to_string()),
                ContentBlock::ToolUse {
                    id: "c1".to_string(),
                    name: "github_list_pull_request".to_string(),
                    input: json!({}),
                },
                ContentBlock::ToolUse {
                    id: "c2".to_string(),
                    name: "github_pull_request".to_string(),
                    input: json!({"pr_number": 1}),
                },
            ],
        };

        match parse(&response).unwrap() {
            AgentStep::FunctionCall(call) => assert_eq!(call.id, "c1"),
            other => panic!("expected function call, got {:?}", other),
        }
    }

    #[test]
    fn text_only_classifies_as_final_answer() {
        let response = ModelResponse {
            content: vec![ContentBlock::Text("There are 2 open PRs.".to_string())],
        };
        assert_eq!(
            parse(&response).unwrap(),
            AgentStep::FinalAnswer("There are 2 open PRs.".to_string())
        );
    }

    #[test]
    fn empty_response_is_a_parse_error() {
        let response = ModelResponse { content: vec![] };
        assert!(parse(&response).is_err());
    }

    #[test]
    fn whitespace_only_text_is_a_parse_error() {
        let response = ModelResponse {
            content: vec![ContentBlock::Text("   \n".to_string())],
        };
        assert!(parse(&response).is_err());
    }
}
