//! GitHub API client and pull request tools.
//!
//! Each tool issues one HTTPS call against `api.github.com` using the
//! configured bearer token. The repository defaults to the configured
//! owner/name, but the model may override either per call.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::Config;

use super::{Tool, ToolError};

const API_BASE: &str = "https://api.github.com";
const API_VERSION: &str = "2022-11-28";
const USER_AGENT: &str = concat!("review-agent/", env!("CARGO_PKG_VERSION"));

/// Thin client over the GitHub REST API.
pub struct GitHubClient {
    http: reqwest::Client,
    token: String,
    owner: String,
    repo: String,
}

impl GitHubClient {
    /// Build a client from the service configuration.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(config.github_timeout_secs))
            .build()?;

        Ok(Self {
            http,
            token: config.github_token.clone(),
            owner: config.github_owner.clone(),
            repo: config.github_repo.clone(),
        })
    }

    pub fn default_owner(&self) -> &str {
        &self.owner
    }

    pub fn default_repo(&self) -> &str {
        &self.repo
    }

    /// List open pull requests, most recently updated first.
    pub async fn list_pull_requests(&self, owner: &str, repo: &str) -> Result<Value, ToolError> {
        let url = format!(
            "{}/repos/{}/{}/pulls?state=open&sort=updated&direction=desc",
            API_BASE, owner, repo
        );
        let pulls: Vec<PullRequestWire> = self.get_json(&url).await?;
        Ok(summarize_pull_requests(&pulls))
    }

    /// Fetch one pull request's detail.
    pub async fn get_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Value, ToolError> {
        let url = format!("{}/repos/{}/{}/pulls/{}", API_BASE, owner, repo, number);
        let pull: PullRequestWire = self.get_json(&url).await?;
        Ok(pull_request_detail(&pull))
    }

    /// Post a comment on a pull request. PR comments go through the
    /// issues endpoint on the REST API.
    pub async fn comment_on_pull_request(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
        body: &str,
    ) -> Result<Value, ToolError> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/comments",
            API_BASE, owner, repo, number
        );
        let request = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION)
            .json(&json!({ "body": body }));

        let comment: CommentWire = send(request).await?;
        Ok(json!({
            "id": comment.id,
            "url": comment.html_url,
        }))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ToolError> {
        let request = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", API_VERSION);
        send(request).await
    }
}

async fn send<T: serde::de::DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, ToolError> {
    let response = request
        .send()
        .await
        .map_err(|e| ToolError::Transport(e.to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ToolError::Transport(e.to_string()))?;

    if !status.is_success() {
        return Err(ToolError::Api {
            status: status.as_u16(),
            message: body,
        });
    }

    serde_json::from_str(&body)
        .map_err(|e| ToolError::Transport(format!("undecodable GitHub response: {}", e)))
}

// ── Wire types and payload mapping ────────────────────────────────

#[derive(Debug, Deserialize)]
struct PullRequestWire {
    number: u64,
    title: String,
    state: String,
    html_url: String,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    user: Option<UserWire>,
    created_at: String,
    updated_at: String,
    #[serde(default)]
    comments: Option<u64>,
    #[serde(default)]
    additions: Option<u64>,
    #[serde(default)]
    deletions: Option<u64>,
    #[serde(default)]
    changed_files: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct UserWire {
    login: String,
}

#[derive(Debug, Deserialize)]
struct CommentWire {
    id: u64,
    html_url: String,
}

fn summarize_pull_requests(pulls: &[PullRequestWire]) -> Value {
    let summaries: Vec<Value> = pulls
        .iter()
        .map(|pr| {
            json!({
                "number": pr.number,
                "title": pr.title,
                "state": pr.state,
                "url": pr.html_url,
                "user": pr.user.as_ref().map(|u| u.login.as_str()),
                "created_at": pr.created_at,
                "updated_at": pr.updated_at,
            })
        })
        .collect();
    json!({ "pull_requests": summaries, "count": pulls.len() })
}

fn pull_request_detail(pr: &PullRequestWire) -> Value {
    json!({
        "number": pr.number,
        "title": pr.title,
        "state": pr.state,
        "url": pr.html_url,
        "body": pr.body,
        "user": pr.user.as_ref().map(|u| u.login.as_str()),
        "created_at": pr.created_at,
        "updated_at": pr.updated_at,
        "comments": pr.comments,
        "additions": pr.additions,
        "deletions": pr.deletions,
        "changed_files": pr.changed_files,
    })
}

// ── Argument validation helpers ───────────────────────────────────

fn repo_coordinates(github: &GitHubClient, args: &Value) -> (String, String) {
    let owner = args
        .get("owner")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| github.default_owner())
        .to_string();
    let repo = args
        .get("repo_name")
        .and_then(|v| v.as_str())
        .unwrap_or_else(|| github.default_repo())
        .to_string();
    (owner, repo)
}

fn require_u64(args: &Value, key: &str) -> Result<u64, ToolError> {
    args.get(key)
        .and_then(|v| v.as_u64())
        .ok_or_else(|| ToolError::InvalidInput(format!("missing required parameter: {}", key)))
}

fn require_str<'a>(args: &'a Value, key: &str) -> Result<&'a str, ToolError> {
    args.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| ToolError::InvalidInput(format!("missing required parameter: {}", key)))
}

// ── Tools ─────────────────────────────────────────────────────────

/// List the open pull requests of a repository.
pub struct ListPullRequests {
    github: Arc<GitHubClient>,
}

impl ListPullRequests {
    pub fn new(github: Arc<GitHubClient>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for ListPullRequests {
    fn name(&self) -> &str {
        "github_list_pull_request"
    }

    fn description(&self) -> &str {
        "List the open pull requests of the repository, most recently updated first. Returns number, title, state, author, and URL for each."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "owner": {
                    "type": "string",
                    "description": "Repository owner. Defaults to the configured repository."
                },
                "repo_name": {
                    "type": "string",
                    "description": "Repository name. Defaults to the configured repository."
                }
            },
            "required": []
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let (owner, repo) = repo_coordinates(&self.github, &args);
        self.github.list_pull_requests(&owner, &repo).await
    }
}

/// Fetch one pull request's detail.
pub struct GetPullRequest {
    github: Arc<GitHubClient>,
}

impl GetPullRequest {
    pub fn new(github: Arc<GitHubClient>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for GetPullRequest {
    fn name(&self) -> &str {
        "github_pull_request"
    }

    fn description(&self) -> &str {
        "Fetch the detail of one pull request: title, description, author, state, and change statistics."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pr_number": {
                    "type": "integer",
                    "description": "The pull request number"
                },
                "owner": {
                    "type": "string",
                    "description": "Repository owner. Defaults to the configured repository."
                },
                "repo_name": {
                    "type": "string",
                    "description": "Repository name. Defaults to the configured repository."
                }
            },
            "required": ["pr_number"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let number = require_u64(&args, "pr_number")?;
        let (owner, repo) = repo_coordinates(&self.github, &args);
        self.github.get_pull_request(&owner, &repo, number).await
    }
}

/// Post a review comment on a pull request. The only tool with an
/// irreversible external side effect; the loop invokes it at most once
/// per model decision and never retries it.
pub struct CommentOnPullRequest {
    github: Arc<GitHubClient>,
}

impl CommentOnPullRequest {
    pub fn new(github: Arc<GitHubClient>) -> Self {
        Self { github }
    }
}

#[async_trait]
impl Tool for CommentOnPullRequest {
    fn name(&self) -> &str {
        "github_comment_on_pull_request"
    }

    fn description(&self) -> &str {
        "Post a comment on a pull request. Use only when the user asked for feedback to be published on the PR."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pr_number": {
                    "type": "integer",
                    "description": "The pull request number"
                },
                "body": {
                    "type": "string",
                    "description": "The comment text, GitHub-flavored Markdown"
                },
                "owner": {
                    "type": "string",
                    "description": "Repository owner. Defaults to the configured repository."
                },
                "repo_name": {
                    "type": "string",
                    "description": "Repository name. Defaults to the configured repository."
                }
            },
            "required": ["pr_number", "body"]
        })
    }

    async fn invoke(&self, args: Value) -> Result<Value, ToolError> {
        let number = require_u64(&args, "pr_number")?;
        let body = require_str(&args, "body")?;
        let (owner, repo) = repo_coordinates(&self.github, &args);
        self.github
            .comment_on_pull_request(&owner, &repo, number, body)
            .await
    }
}
