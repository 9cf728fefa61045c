//! Chat-completions client for conversational replies.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint (Together AI
//! by default). Every failure mode collapses to `None` so the caller can
//! substitute a canned reply.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Text generation seam used by the advisor service.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a reply, or `None` when the backend is unavailable.
    async fn generate(&self, system_prompt: &str, user_message: &str) -> Option<String>;

    /// Model identifier reported alongside replies.
    fn model_name(&self) -> &str;
}

/// Configuration for the hosted language model.
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Full chat-completions URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    /// Bearer token. Falls back to `TOGETHER_API_KEY` when unset.
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Whether the model is called at all.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_api_url() -> String {
    "https://api.together.xyz/v1/chat/completions".into()
}
fn default_model() -> String {
    "meta-llama/Llama-2-7b-chat-hf".into()
}
fn default_max_tokens() -> u32 {
    500
}
fn default_temperature() -> f64 {
    0.7
}
fn default_timeout_secs() -> u64 {
    30
}
fn default_enabled() -> bool {
    true
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            model: default_model(),
            api_key: None,
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            enabled: default_enabled(),
        }
    }
}

impl LlmConfig {
    /// Configured key, else the `TOGETHER_API_KEY` environment variable.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("TOGETHER_API_KEY").ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f64,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

/// Only the fields we read.
#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
pub struct ChatCompletionsClient {
    client: reqwest::Client,
    config: LlmConfig,
    api_key: Option<String>,
}

impl ChatCompletionsClient {
    pub fn new(config: LlmConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .expect("failed to build reqwest client");
        let api_key = config.resolved_api_key();
        if api_key.is_none() {
            tracing::warn!("no language-model API key configured, replies will use canned text");
        }
        Self {
            client,
            config,
            api_key,
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

#[async_trait]
impl TextGenerator for ChatCompletionsClient {
    async fn generate(&self, system_prompt: &str, user_message: &str) -> Option<String> {
        let api_key = self.api_key.as_deref()?;

        let body = ChatRequest {
            model: &self.config.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: user_message,
                },
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        let response = match self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(error = %e, "language-model request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "language model returned non-200");
            return None;
        }

        let chat_resp: ChatResponse = match response.json().await {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse language-model response body");
                return None;
            }
        };

        let content = chat_resp.choices.into_iter().next()?.message?.content;
        if content.trim().is_empty() {
            tracing::warn!("language model returned an empty reply");
            return None;
        }
        Some(content)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
