//! Configuration schema for avaliador

use crate::error::{AvaliadorError, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable consulted when `llm.api_key` is not set.
pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Main avaliador configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AvaliadorConfig {
    /// Reasoning-service configuration
    #[serde(default)]
    pub llm: LlmConfig,

    /// Stage budget and timeouts
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Review corpus location
    #[serde(default)]
    pub reviews: ReviewsConfig,
}

/// Reasoning-service provider configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider: "openai" or "ollama"
    pub provider: String,

    /// Model name
    pub model: String,

    /// API key (supports `${VAR}` interpolation)
    pub api_key: Option<String>,

    /// Sampling temperature (0.0-2.0)
    pub temperature: f32,

    /// Maximum tokens per reply; provider default when unset
    pub max_tokens: Option<usize>,

    /// API base URL (for compatible gateways or a remote Ollama)
    pub api_base: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            api_key: None,
            temperature: 0.3,
            max_tokens: None,
            api_base: None,
        }
    }
}

/// Pipeline execution configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PipelineConfig {
    /// Reasoning-service round-trips allowed per stage
    pub max_attempts_per_stage: u32,

    /// Timeout for one round-trip, in seconds
    pub request_timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts_per_stage: 2,
            request_timeout_secs: 60,
        }
    }
}

impl PipelineConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Review corpus configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReviewsConfig {
    /// Corpus file, relative to the working directory or absolute
    pub path: PathBuf,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("restaurantes.txt"),
        }
    }
}

impl AvaliadorConfig {
    /// Expand `${VAR}` references in the API key, falling back to
    /// `OPENAI_API_KEY` when no key is configured.
    pub fn resolve_env_vars(&mut self) -> Result<()> {
        let configured = self
            .llm
            .api_key
            .as_deref()
            .map(tooling::config::expand_env_vars)
            .filter(|key| !key.trim().is_empty());

        self.llm.api_key = match configured {
            Some(key) => Some(key),
            None => tooling::config::get_env(OPENAI_API_KEY_ENV)?.filter(|key| !key.trim().is_empty()),
        };
        Ok(())
    }

    /// Reject settings the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.pipeline.max_attempts_per_stage == 0 {
            return Err(AvaliadorError::Config(
                "pipeline.max_attempts_per_stage must be at least 1".to_string(),
            ));
        }

        if self.pipeline.request_timeout_secs == 0 {
            return Err(AvaliadorError::Config(
                "pipeline.request_timeout_secs must be at least 1".to_string(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(AvaliadorError::Config(format!(
                "llm.temperature must be between 0.0 and 2.0, got {}",
                self.llm.temperature
            )));
        }

        if self.llm.model.trim().is_empty() {
            return Err(AvaliadorError::Config("llm.model must not be empty".to_string()));
        }

        match self.llm.provider.to_lowercase().as_str() {
            "openai" if self.llm.api_key.is_none() => Err(AvaliadorError::Config(format!(
                "OpenAI API key not configured; set llm.api_key or {}",
                OPENAI_API_KEY_ENV
            ))),
            "openai" | "ollama" => Ok(()),
            other => Err(AvaliadorError::Config(format!(
                "Unsupported LLM provider: {}. Available: openai, ollama",
                other
            ))),
        }
    }
}
