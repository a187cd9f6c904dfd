//! API server configuration.

use parley_core::context::DEFAULT_SYSTEM_PROMPT;
use parley_core::llm::LlmConfig;

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    /// Address to bind the HTTP listener (e.g. "127.0.0.1:4000").
    pub bind_addr: String,
    /// PostgreSQL connection URL. `None` selects the in-memory store.
    pub database_url: Option<String>,
    /// Language-model provider settings.
    pub llm: LlmConfig,
    /// System prompt placed ahead of every conversation.
    pub system_prompt: String,
}

impl ApiConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable        | Default                            |
    /// |-----------------|------------------------------------|
    /// | `HOST`          | `127.0.0.1`                        |
    /// | `PORT`          | `4000`                             |
    /// | `DATABASE_URL`  | unset (in-memory store)            |
    /// | `SYSTEM_PROMPT` | `You are a helpful AI assistant.`  |
    /// | `GROQ_*`        | see [`LlmConfig::from_env`]        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".into());
        let port = std::env::var("PORT").unwrap_or_else(|_| "4000".into());
        Self {
            bind_addr: format!("{host}:{port}"),
            database_url: std::env::var("DATABASE_URL").ok(),
            llm: LlmConfig::from_env(),
            system_prompt: std::env::var("SYSTEM_PROMPT")
                .unwrap_or_else(|_| DEFAULT_SYSTEM_PROMPT.into()),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:4000".into(),
            database_url: None,
            llm: LlmConfig::default(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.into(),
        }
    }
}
