//! OpenAI-compatible chat completion client

use super::{user_prompt, Analyst, AnalystError, SYSTEM_PROMPT};
use crate::config::AiConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for the chat endpoint
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL, e.g. "https://api.deepseek.com"
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub timeout: Duration,
}

impl ChatConfig {
    /// Create from AiConfig; fails when no API key is set
    pub fn from_config(config: &AiConfig) -> Result<Self, AnalystError> {
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.is_empty())
            .ok_or(AnalystError::NotConfigured("ai.api_key"))?;

        Ok(Self {
            base_url: config.base_url.clone(),
            api_key,
            model: config.model.clone(),
            timeout: Duration::from_secs(config.request_timeout_secs),
        })
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Client for `POST {base_url}/chat/completions`
pub struct ChatClient {
    config: ChatConfig,
    client: Client,
}

impl ChatClient {
    pub fn new(config: ChatConfig) -> Result<Self, AnalystError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request<'a>(&'a self, symbol: &str, table: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(symbol, table),
                },
            ],
        }
    }

    fn extract_content(response: ChatResponse) -> Result<String, AnalystError> {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or(AnalystError::EmptyResponse)
    }
}

#[async_trait]
impl Analyst for ChatClient {
    async fn commentary(&self, symbol: &str, table: &str) -> Result<String, AnalystError> {
        let url = self.completions_url();
        tracing::debug!(url = %url, model = %self.config.model, symbol, "Requesting AI commentary");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&self.build_request(symbol, table))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AnalystError::Status { status, body });
        }

        let parsed: ChatResponse = response.json().await?;
        Self::extract_content(parsed)
    }
}
