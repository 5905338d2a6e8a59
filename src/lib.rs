//! # Review Agent
//!
//! An LLM-driven GitHub pull request review service.
//!
//! This library provides:
//! - An HTTP API for review queries and single-shot code feedback
//! - A tool-calling agent loop over a small set of GitHub tools
//! - Integration with the Anthropic Messages API
//!
//! ## Architecture
//!
//! The agent follows the "tools in a loop" pattern:
//! 1. Receive a review query via the API
//! 2. Build context with the review persona prompt and the GitHub tools
//! 3. Call the model, classify the response, execute any tool call
//! 4. Feed the result back to the model, repeat until a final answer
//!    or a bounded failure
//!
//! ## Example
//!
//! ```rust,ignore
//! use review_agent::{api, config::Config};
//!
//! let config = Config::from_env()?;
//! api::serve(config).await?;
//! ```

pub mod agent;
pub mod api;
pub mod config;
pub mod llm;
pub mod tools;

pub use config::Config;
