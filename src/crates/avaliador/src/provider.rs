//! Reasoning-service selection.
//!
//! Maps the `[llm]` section onto one of the llm crate's clients.

use crate::config::AvaliadorConfig;
use crate::error::{AvaliadorError, Result};
use llm::config::{LocalLlmConfig, RemoteLlmConfig};
use llm::local::OllamaClient;
use llm::remote::OpenAiClient;
use llm::ChatModel;
use std::sync::Arc;
use tracing::debug;

pub const DEFAULT_OPENAI_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_OLLAMA_BASE: &str = "http://localhost:11434";

/// Build the chat model described by `config.llm`.
///
/// The HTTP client timeout matches `pipeline.request_timeout_secs`.
pub fn build_chat_model(config: &AvaliadorConfig) -> Result<Arc<dyn ChatModel>> {
    let llm = &config.llm;
    let provider = llm.provider.to_lowercase();
    let timeout = config.pipeline.request_timeout();

    debug!(provider = %provider, model = %llm.model, "Building chat model");

    match provider.as_str() {
        "openai" => {
            let api_key = llm
                .api_key
                .clone()
                .ok_or_else(|| AvaliadorError::Config("OpenAI API key not configured".to_string()))?;

            let remote_config = RemoteLlmConfig::new(
                api_key,
                llm.api_base.clone().unwrap_or_else(|| DEFAULT_OPENAI_BASE.to_string()),
                llm.model.clone(),
            )
            .with_timeout(timeout);
            Ok(Arc::new(OpenAiClient::new(remote_config)?))
        }

        "ollama" => {
            let local_config = LocalLlmConfig::new(
                llm.api_base.clone().unwrap_or_else(|| DEFAULT_OLLAMA_BASE.to_string()),
                llm.model.clone(),
            )
            .with_timeout(timeout);
            Ok(Arc::new(OllamaClient::new(local_config)?))
        }

        _ => Err(AvaliadorError::Config(format!(
            "Unsupported LLM provider: {}. Available: openai, ollama",
            provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_requires_key() {
        let config = AvaliadorConfig::default();
        let err = build_chat_model(&config).err().unwrap();
        assert!(err.to_string().contains("API key"));
    }

    #[test]
    fn test_openai_with_key() {
        let mut config = AvaliadorConfig::default();
        config.llm.api_key = Some("sk-test".to_string());
        let model = build_chat_model(&config).unwrap();
        assert_eq!(model.model_name(), "gpt-3.5-turbo");
    }

    #[test]
    fn test_ollama() {
        let mut config = AvaliadorConfig::default();
        config.llm.provider = "ollama".to_string();
        config.llm.model = "llama3".to_string();
        let model = build_chat_model(&config).unwrap();
        assert_eq!(model.model_name(), "llama3");
    }

    #[test]
    fn test_unknown_provider() {
        let mut config = AvaliadorConfig::default();
        config.llm.provider = "claude".to_string();
        assert!(build_chat_model(&config).is_err());
    }
}
