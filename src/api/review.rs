//! Review endpoints.
//!
//! `POST /v1/code-review` runs the agent loop against the configured
//! repository. `POST /v1/code` is a stateless single model call with
//! no tools. One executor per request; nothing is shared between
//! requests except the read-only registry and clients.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use uuid::Uuid;

use crate::agent::{AgentExecutor, CODE_FEEDBACK_PROMPT};
use crate::llm::Message;

use super::routes::AppState;
use super::types::{
    CodeRequest, CodeResponse, CodeReviewRequest, CodeReviewResponse, ErrorResponse,
    HealthResponse,
};

pub type ApiResult<T> = Result<(StatusCode, Json<T>), ApiError>;

/// Request-level errors, serialized to the error envelope.
#[derive(Debug)]
pub enum ApiError {
    MissingQuery,
    MissingCode,
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MissingQuery => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Missing query parameter".to_string(),
                    success: None,
                },
            ),
            ApiError::MissingCode => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: "Missing code parameter".to_string(),
                    success: None,
                },
            ),
            ApiError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorResponse {
                    error: message,
                    success: Some(false),
                },
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /v1/code-review`
pub async fn code_review(
    State(state): State<AppState>,
    Json(request): Json<CodeReviewRequest>,
) -> ApiResult<CodeReviewResponse> {
    let query = request
        .query
        .filter(|q| !q.trim().is_empty())
        .ok_or(ApiError::MissingQuery)?;

    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, "starting code review request");

    let executor = AgentExecutor::new(
        state.llm.clone(),
        state.tools.clone(),
        state.config.model.clone(),
        state.config.max_iterations,
    );

    let run = executor.run(&query).await.map_err(|e| {
        tracing::error!(%request_id, error = %e, "code review request failed");
        ApiError::Internal(e.to_string())
    })?;

    tracing::info!(%request_id, iterations = run.iterations, "code review request completed");

    Ok((
        StatusCode::CREATED,
        Json(CodeReviewResponse {
            response: run.output,
            success: true,
        }),
    ))
}

/// `POST /v1/code`
pub async fn code_feedback(
    State(state): State<AppState>,
    Json(request): Json<CodeRequest>,
) -> ApiResult<CodeResponse> {
    let code = request
        .data
        .and_then(|d| d.code)
        .filter(|c| !c.trim().is_empty())
        .ok_or(ApiError::MissingCode)?;

    let messages = [
        Message::System(CODE_FEEDBACK_PROMPT.to_string()),
        Message::Human(code),
    ];

    let response = state
        .llm
        .chat_completion(&state.config.model, &messages, None)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "code feedback request failed");
            ApiError::Internal(e.to_string())
        })?;

    let text = response.text();
    if text.trim().is_empty() {
        return Err(ApiError::Internal(
            "model returned an empty response".to_string(),
        ));
    }

    Ok((StatusCode::CREATED, Json(CodeResponse { code: text })))
}

/// `GET /health`
pub async fn health() -> (StatusCode, Json<HealthResponse>) {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::CodePayload;
    use crate::config::Config;
    use crate::llm::{
        ContentBlock, FunctionDeclaration, LlmClient, LlmError, ModelResponse,
    };
    use crate::tools::{Tool, ToolError, ToolRegistry};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct ScriptedLlm {
        responses: Mutex<VecDeque<ModelResponse>>,
        calls: AtomicUsize,
    }

    impl ScriptedLlm {
        fn new(responses: Vec<ModelResponse>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmClient for ScriptedLlm {
        async fn chat_completion(
            &self,
            _model: &str,
            _messages: &[Message],
            _tools: Option<&[FunctionDeclaration]>,
        ) -> Result<ModelResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::Unavailable("script exhausted".to_string()))
        }
    }

    struct StaticTool {
        name: &'static str,
        payload: Value,
    }

    #[async_trait]
    impl Tool for StaticTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "test tool"
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object", "properties": {}})
        }

        async fn invoke(&self, _args: Value) -> Result<Value, ToolError> {
            Ok(self.payload.clone())
        }
    }

    fn state_with(llm: Arc<ScriptedLlm>, tools: ToolRegistry) -> AppState {
        AppState {
            config: Arc::new(Config::new(
                "sk-test".to_string(),
                "ghp_test".to_string(),
                "octocat".to_string(),
                "hello-world".to_string(),
            )),
            llm,
            tools: Arc::new(tools),
        }
    }

    #[tokio::test]
    async fn missing_query_is_rejected_without_model_calls() {
        let llm = ScriptedLlm::new(vec![]);
        let state = state_with(llm.clone(), ToolRegistry::new());

        let result = code_review(
            State(state),
            Json(CodeReviewRequest { query: None }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::MissingQuery)));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_query_counts_as_missing() {
        let llm = ScriptedLlm::new(vec![]);
        let state = state_with(llm.clone(), ToolRegistry::new());

        let result = code_review(
            State(state),
            Json(CodeReviewRequest {
                query: Some("   ".to_string()),
            }),
        )
        .await;

        assert!(matches!(result, Err(ApiError::MissingQuery)));
    }

    #[tokio::test]
    async fn list_prs_scenario_returns_success_envelope() {
        let mut registry = ToolRegistry::new();
        registry
            .register(Arc::new(StaticTool {
                name: "github_list_pull_request",
                payload: json!({
                    "pull_requests": [
                        {"number": 1, "title": "Add CI"},
                        {"number": 2, "title": "Fix docs"}
                    ],
                    "count": 2
                }),
            }))
            .unwrap();

        let llm = ScriptedLlm::new(vec![
            ModelResponse {
                content: vec![ContentBlock::ToolUse {
                    id: "c1".to_string(),
                    name: "github_list_pull_request".to_string(),
                    input: json!({"repo_name": "x", "owner": "y"}),
                }],
            },
            ModelResponse {
                content: vec![ContentBlock::Text(
                    "There are 2 open PRs: #1 Add CI, #2 Fix docs.".to_string(),
                )],
            },
        ]);

        let state = state_with(llm, registry);
        let (status, Json(body)) = code_review(
            State(state),
            Json(CodeReviewRequest {
                query: Some("list open PRs".to_string()),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert!(body.success);
        assert!(body.response.starts_with("There are 2 open PRs"));
    }

    #[tokio::test]
    async fn agent_failure_maps_to_internal_error() {
        // Unknown tool is a request-level failure.
        let llm = ScriptedLlm::new(vec![ModelResponse {
            content: vec![ContentBlock::ToolUse {
                id: "c1".to_string(),
                name: "nonexistent_tool".to_string(),
                input: json!({}),
            }],
        }]);
        let state = state_with(llm, ToolRegistry::new());

        let result = code_review(
            State(state),
            Json(CodeReviewRequest {
                query: Some("do something".to_string()),
            }),
        )
        .await;

        match result {
            Err(ApiError::Internal(message)) => {
                assert!(message.contains("nonexistent_tool"));
            }
            other => panic!("expected internal error, got {:?}", other.is_ok()),
        }
    }

    #[tokio::test]
    async fn code_feedback_is_a_single_stateless_call() {
        let llm = ScriptedLlm::new(vec![ModelResponse {
            content: vec![ContentBlock::Text("Prefer iterators here.".to_string())],
        }]);
        let state = state_with(llm.clone(), ToolRegistry::new());

        let (status, Json(body)) = code_feedback(
            State(state),
            Json(CodeRequest {
                data: Some(CodePayload {
                    code: Some("for i in 0..v.len() { println!(\"{}\", v[i]); }".to_string()),
                }),
            }),
        )
        .await
        .unwrap();

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body.code, "Prefer iterators here.");
        assert_eq!(llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn code_feedback_requires_a_snippet() {
        let llm = ScriptedLlm::new(vec![]);
        let state = state_with(llm.clone(), ToolRegistry::new());

        let result = code_feedback(State(state), Json(CodeRequest { data: None })).await;
        assert!(matches!(result, Err(ApiError::MissingCode)));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn error_envelopes_match_the_contract() {
        let body = serde_json::to_value(ErrorResponse {
            error: "Missing query parameter".to_string(),
            success: None,
        })
        .unwrap();
        assert_eq!(body, json!({"error": "Missing query parameter"}));

        let body = serde_json::to_value(ErrorResponse {
            error: "boom".to_string(),
            success: Some(false),
        })
        .unwrap();
        assert_eq!(body, json!({"error": "boom", "success": false}));
    }
}
