//! System prompt templates for the review agent.

use crate::tools::ToolRegistry;

/// System prompt for the single-shot code feedback endpoint.
pub const CODE_FEEDBACK_PROMPT: &str =
    "You are a senior software engineer. Give feedback on this code to help a junior engineer.";

/// Build the review-persona system prompt with tool definitions.
pub fn build_system_prompt(tools: &ToolRegistry) -> String {
    let tool_descriptions = tools
        .all()
        .iter()
        .map(|t| format!("- **{}**: {}", t.name(), t.description()))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are a senior software engineer reviewing GitHub pull requests for a team.

## Your Capabilities

You have access to the following tools:
{tool_descriptions}

## Rules and Guidelines

1. **Use tools for facts** - Don't guess PR numbers, titles, or contents. Fetch them.

2. **Read before judging** - Fetch a pull request's detail before commenting on its substance.

3. **Comment deliberately** - Posting a comment is visible to the whole team. Only post one when the user asked for feedback to be published, and post it once.

4. **Recover from errors** - If a tool reports an error, check your arguments and adjust; don't repeat the same failing call.

5. **Stay focused** - Answer the user's question about the repository; don't volunteer unrelated analysis.

## Response Format

When you have what you need, answer in plain prose, citing pull requests by number. If you need a tool, respond with a tool call and the system will return the result."#,
        tool_descriptions = tool_descriptions
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{default_registry, GitHubClient};
    use crate::config::Config;
    use std::sync::Arc;

    #[test]
    fn prompt_lists_every_registered_tool() {
        let config = Config::new(
            "sk-test".to_string(),
            "ghp_test".to_string(),
            "octocat".to_string(),
            "hello-world".to_string(),
        );
        let github = Arc::new(GitHubClient::new(&config).unwrap());
        let registry = default_registry(github).unwrap();

        let prompt = build_system_prompt(&registry);
        for tool in registry.all() {
            assert!(prompt.contains(tool.name()));
        }
    }
}
