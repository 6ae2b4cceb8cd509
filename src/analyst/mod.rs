//! AI analyst module
//!
//! Sends a short textual dump of recent samples to a chat-completion
//! endpoint and returns the free-text commentary as-is.

mod chat;

pub use chat::{ChatClient, ChatConfig};

use async_trait::async_trait;
use thiserror::Error;

/// Fixed instruction sent as the system message
pub const SYSTEM_PROMPT: &str = "You are a senior cryptocurrency analyst. Analyse the price \
momentum in the time series provided. Answer in this format: \
1. Trend; 2. Key levels; 3. Suggested action.";

/// Analyst errors
#[derive(Debug, Error)]
pub enum AnalystError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("AI endpoint returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("AI response had no content")]
    EmptyResponse,
    #[error("AI endpoint is not configured: {0}")]
    NotConfigured(&'static str),
}

/// Trait for commentary providers
#[async_trait]
pub trait Analyst: Send + Sync {
    /// Commentary on `table`, the recent samples of `symbol`
    async fn commentary(&self, symbol: &str, table: &str) -> Result<String, AnalystError>;
}

/// User message carrying the data dump
pub fn user_prompt(symbol: &str, table: &str) -> String {
    format!("Recent {} samples:\n{}", symbol, table)
}
