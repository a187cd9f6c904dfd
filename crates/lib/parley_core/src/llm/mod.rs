//! Language-model client.
//!
//! [`ChatModel`] is the seam between the chat service and the hosted model.
//! [`groq::GroqClient`] talks to any OpenAI-compatible `chat/completions`
//! endpoint (Groq by default).

pub mod config;
pub mod groq;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use config::LlmConfig;
pub use groq::GroqClient;

/// Errors that can occur while generating a completion.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Rate limited by provider")]
    RateLimited,

    #[error("Provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Request failed: {0}")]
    Transport(String),

    #[error("Response parse error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Speaker of a completion message on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionRole {
    System,
    User,
    Assistant,
}

/// One entry of the message list sent to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionMessage {
    pub role: CompletionRole,
    pub content: String,
}

impl CompletionMessage {
    pub fn new(role: CompletionRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// A hosted chat model.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Generate the reply to `messages`. An empty reply is returned as `""`.
    async fn complete(&self, messages: &[CompletionMessage]) -> Result<String, LlmError>;

    /// Model identifier, for logging.
    fn name(&self) -> &str;
}
