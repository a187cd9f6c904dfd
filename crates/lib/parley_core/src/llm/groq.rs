//! OpenAI-compatible chat completions client.
//!
//! Calls `POST {base_url}/chat/completions` once per prompt. No retries:
//! a 429 surfaces as [`LlmError::RateLimited`], any other non-success status
//! as [`LlmError::Status`].

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::LlmConfig;
use super::{ChatModel, CompletionMessage, LlmError};

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [CompletionMessage],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// First choice's content, or `""` when the provider sent none.
fn reply_text(response: CompletionResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .unwrap_or_default()
}

/// Map a non-success provider status to an error.
fn status_error(status: StatusCode, body: String) -> LlmError {
    if status == StatusCode::TOO_MANY_REQUESTS {
        LlmError::RateLimited
    } else {
        LlmError::Status {
            status: status.as_u16(),
            body,
        }
    }
}

/// Client for Groq (or any OpenAI-compatible provider).
#[derive(Debug, Clone)]
pub struct GroqClient {
    http: Client,
    config: LlmConfig,
}

impl GroqClient {
    pub fn new(config: LlmConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Build on a caller-provided HTTP client (shared pools, custom timeouts).
    pub fn with_client(http: Client, config: LlmConfig) -> Self {
        Self { http, config }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }
}

#[async_trait]
impl ChatModel for GroqClient {
    async fn complete(&self, messages: &[CompletionMessage]) -> Result<String, LlmError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| LlmError::Config("GROQ_API_KEY is not set".to_string()))?;
        let url = self.config.completions_url()?;

        debug!(model = %self.config.model, messages = messages.len(), "requesting completion");

        let resp = self
            .http
            .post(url)
            .bearer_auth(api_key)
            .json(&CompletionRequest {
                model: &self.config.model,
                messages,
                temperature: self.config.temperature,
                max_tokens: self.config.max_tokens,
            })
            .send()
            .await
            .map_err(|e| LlmError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(status_error(status, body));
        }

        let data: CompletionResponse = resp
            .json()
            .await
            .map_err(|e| LlmError::Decode(e.to_string()))?;

        Ok(reply_text(data))
    }

    fn name(&self) -> &str {
        &self.config.model
    }
}
