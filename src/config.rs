//! Configuration management for the review service.
//!
//! Configuration can be set via environment variables:
//! - `ANTHROPIC_API_KEY` - Required. API key for the model provider.
//! - `GITHUB_TOKEN` - Required. Bearer token for the GitHub API.
//! - `GITHUB_REPO_OWNER` - Required. Owner of the repository under review.
//! - `GITHUB_REPO_NAME` - Required. Name of the repository under review.
//! - `ANTHROPIC_MODEL` - Optional. Model identifier. Defaults to `claude-3-haiku-20240307`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_ITERATIONS` - Optional. Maximum agent loop iterations. Defaults to `10`.
//! - `MAX_TOKENS` - Optional. Model completion budget. Defaults to `1024`.
//! - `TEMPERATURE` - Optional. Model sampling temperature. Defaults to `0.7`.
//! - `MODEL_TIMEOUT_SECS` - Optional. Model request timeout. Defaults to `30`.
//! - `GITHUB_TIMEOUT_SECS` - Optional. GitHub request timeout. Defaults to `10`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Service configuration, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Config {
    /// Model provider API key
    pub anthropic_api_key: String,

    /// Model identifier
    pub model: String,

    /// GitHub API bearer token
    pub github_token: String,

    /// Owner of the repository the tools operate on by default
    pub github_owner: String,

    /// Name of the repository the tools operate on by default
    pub github_repo: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum iterations for the agent loop
    pub max_iterations: usize,

    /// Completion token budget per model call
    pub max_tokens: u32,

    /// Model sampling temperature
    pub temperature: f32,

    /// Timeout for one model call, in seconds
    pub model_timeout_secs: u64,

    /// Timeout for one GitHub call, in seconds
    pub github_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if any of the required
    /// variables (`ANTHROPIC_API_KEY`, `GITHUB_TOKEN`,
    /// `GITHUB_REPO_OWNER`, `GITHUB_REPO_NAME`) is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let anthropic_api_key = require_env("ANTHROPIC_API_KEY")?;
        let github_token = require_env("GITHUB_TOKEN")?;
        let github_owner = require_env("GITHUB_REPO_OWNER")?;
        let github_repo = require_env("GITHUB_REPO_NAME")?;

        let model = std::env::var("ANTHROPIC_MODEL")
            .unwrap_or_else(|_| "claude-3-haiku-20240307".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = parse_env("PORT", 3000u16)?;
        let max_iterations = parse_env("MAX_ITERATIONS", 10usize)?;
        let max_tokens = parse_env("MAX_TOKENS", 1024u32)?;
        let temperature = parse_env("TEMPERATURE", 0.7f32)?;
        let model_timeout_secs = parse_env("MODEL_TIMEOUT_SECS", 30u64)?;
        let github_timeout_secs = parse_env("GITHUB_TIMEOUT_SECS", 10u64)?;

        Ok(Self {
            anthropic_api_key,
            model,
            github_token,
            github_owner,
            github_repo,
            host,
            port,
            max_iterations,
            max_tokens,
            temperature,
            model_timeout_secs,
            github_timeout_secs,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(
        anthropic_api_key: String,
        github_token: String,
        github_owner: String,
        github_repo: String,
    ) -> Self {
        Self {
            anthropic_api_key,
            model: "claude-3-haiku-20240307".to_string(),
            github_token,
            github_owner,
            github_repo,
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_iterations: 10,
            max_tokens: 1024,
            temperature: 0.7,
            model_timeout_secs: 30,
            github_timeout_secs: 10,
        }
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnvVar(name.to_string()))
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| ConfigError::InvalidValue(name.to_string(), format!("{}", e))),
        Err(_) => Ok(default),
    }
}
