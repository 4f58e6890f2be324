//! Connection settings for reasoning-service providers.

use crate::error::{LlmError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings for a server on localhost or the local network (Ollama).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalLlmConfig {
    /// e.g. `http://localhost:11434`
    pub base_url: String,

    pub model: String,

    /// Per-request HTTP timeout.
    #[serde(default = "default_timeout")]
    pub timeout: Duration,
}

impl LocalLlmConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: trim_base_url(base_url.into()),
            model: model.into(),
            timeout: default_timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Settings for a hosted, key-authenticated API (OpenAI and compatibles).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteLlmConfig {
    pub api_key: String,

    /// e.g. `https://api.openai.com/v1`
    pub base_url: String,

    pub model: String,

    #[serde(default = "default_timeout")]
    pub timeout: Duration,

    /// Sent as `OpenAI-Organization` when present.
    pub organization: Option<String>,
}

impl RemoteLlmConfig {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: trim_base_url(base_url.into()),
            model: model.into(),
            timeout: default_timeout(),
            organization: None,
        }
    }

    /// Read the API key from `env_var`.
    pub fn from_env(
        env_var: &str,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Result<Self> {
        let api_key = std::env::var(env_var)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| LlmError::ApiKeyNotFound(format!("Environment variable: {}", env_var)))?;

        Ok(Self::new(api_key, base_url, model))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }
}

fn trim_base_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(60)
}
