//! LLM provider configuration.

use url::Url;

use super::LlmError;

/// Default OpenAI-compatible endpoint (Groq).
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default completion model.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default reply length cap, in tokens.
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// Resolved LLM configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Bearer token for the provider. Requests fail with a config error when unset.
    pub api_key: Option<String>,
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl LlmConfig {
    /// Reads configuration from environment variables with sensible defaults.
    ///
    /// | Variable           | Default                           |
    /// |--------------------|-----------------------------------|
    /// | `GROQ_API_KEY`     | unset                             |
    /// | `GROQ_BASE_URL`    | `https://api.groq.com/openai/v1`  |
    /// | `GROQ_MODEL`       | `llama-3.3-70b-versatile`         |
    /// | `GROQ_TEMPERATURE` | `0.7`                             |
    /// | `GROQ_MAX_TOKENS`  | `1024`                            |
    ///
    /// Unparseable numeric values fall back to the default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`LlmConfig::from_env`] with an injectable variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            api_key: lookup("GROQ_API_KEY").filter(|k| !k.trim().is_empty()),
            base_url: lookup("GROQ_BASE_URL").unwrap_or(defaults.base_url),
            model: lookup("GROQ_MODEL").unwrap_or(defaults.model),
            temperature: lookup("GROQ_TEMPERATURE")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.temperature),
            max_tokens: lookup("GROQ_MAX_TOKENS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_tokens),
        }
    }

    /// Full URL of the completions endpoint.
    ///
    /// The base must use HTTPS unless it points at localhost.
    pub fn completions_url(&self) -> Result<Url, LlmError> {
        let base: Url = self
            .base_url
            .parse()
            .map_err(|e| LlmError::Config(format!("Invalid base URL '{}': {e}", self.base_url)))?;

        let host = base.host_str().unwrap_or("");
        let is_safe =
            base.scheme() == "https" || host == "localhost" || host == "127.0.0.1" || host == "[::1]";
        if !is_safe {
            return Err(LlmError::Config(
                "Base URL must use HTTPS or localhost".into(),
            ));
        }

        let joined = format!("{}/chat/completions", base.as_str().trim_end_matches('/'));
        joined
            .parse()
            .map_err(|e| LlmError::Config(format!("Invalid completions URL: {e}")))
    }
}
