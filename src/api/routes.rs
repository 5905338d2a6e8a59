//! HTTP router and server entry.

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::llm::{AnthropicClient, LlmClient};
use crate::tools::{default_registry, GitHubClient, ToolRegistry};

use super::review;

/// Read-only state shared across all requests.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub llm: Arc<dyn LlmClient>,
    pub tools: Arc<ToolRegistry>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(review::health))
        .route("/v1/code-review", post(review::code_review))
        .route("/v1/code", post(review::code_feedback))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Build the shared state and serve until shutdown.
pub async fn serve(config: Config) -> anyhow::Result<()> {
    let config = Arc::new(config);

    let llm: Arc<dyn LlmClient> = Arc::new(AnthropicClient::new(&config)?);
    let github = Arc::new(GitHubClient::new(&config)?);
    let tools = Arc::new(default_registry(github)?);

    let state = AppState {
        config: config.clone(),
        llm,
        tools,
    };

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", addr);

    axum::serve(listener, build_router(state)).await?;

    Ok(())
}
