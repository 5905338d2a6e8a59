//! API request and response types.

use serde::{Deserialize, Serialize};

/// Request to review something in the configured repository.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeReviewRequest {
    /// The natural-language review query
    #[serde(default)]
    pub query: Option<String>,
}

/// Successful review response.
#[derive(Debug, Clone, Serialize)]
pub struct CodeReviewResponse {
    /// The agent's final answer
    pub response: String,
    pub success: bool,
}

/// Request for single-shot feedback on a code snippet.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeRequest {
    #[serde(default)]
    pub data: Option<CodePayload>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CodePayload {
    #[serde(default)]
    pub code: Option<String>,
}

/// Successful snippet feedback response.
#[derive(Debug, Clone, Serialize)]
pub struct CodeResponse {
    /// Model feedback on the snippet
    pub code: String,
}

/// Error envelope for failed requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    /// Present (and false) on request-level failures; absent on
    /// validation errors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,

    /// Service version
    pub version: String,
}
