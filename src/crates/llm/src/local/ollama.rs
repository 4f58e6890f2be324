//! Ollama client.
//!
//! Talks to the `/api/chat` endpoint of a local Ollama server with
//! streaming disabled.

use crate::chat::{ChatModel, ChatRequest, ChatResponse, Message, UsageMetadata};
use crate::config::LocalLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Ollama client for local inference.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    config: LocalLlmConfig,
    client: Client,
}

impl OllamaClient {
    pub fn new(config: LocalLlmConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    /// Check if the Ollama server answers on `/api/tags`.
    pub async fn check_health(&self) -> bool {
        let url = format!("{}/api/tags", self.config.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    fn convert_message(&self, msg: &Message) -> OllamaMessage {
        OllamaMessage {
            role: msg.role.as_str().to_string(),
            content: msg.content.clone(),
        }
    }

    fn build_body(&self, request: &ChatRequest) -> OllamaRequest {
        let mut options = HashMap::new();
        if let Some(temp) = request.config.temperature {
            options.insert("temperature", serde_json::Value::from(temp));
        }
        if let Some(max_tokens) = request.config.max_tokens {
            options.insert("num_predict", serde_json::Value::from(max_tokens));
        }
        if !request.config.stop_sequences.is_empty() {
            options.insert("stop", serde_json::Value::from(request.config.stop_sequences.clone()));
        }

        OllamaRequest {
            model: self.config.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| self.convert_message(m))
                .collect(),
            stream: false,
            options: if options.is_empty() { None } else { Some(options) },
        }
    }

    fn convert_response(&self, ollama_resp: OllamaResponse) -> ChatResponse {
        let usage = if ollama_resp.prompt_eval_count.is_some() || ollama_resp.eval_count.is_some() {
            Some(UsageMetadata::new(
                ollama_resp.prompt_eval_count.unwrap_or(0),
                ollama_resp.eval_count.unwrap_or(0),
            ))
        } else {
            None
        };

        let mut metadata = HashMap::new();
        metadata.insert(
            "model".to_string(),
            serde_json::Value::String(ollama_resp.model),
        );
        if let Some(total_duration) = ollama_resp.total_duration {
            metadata.insert(
                "total_duration_ns".to_string(),
                serde_json::Value::Number(total_duration.into()),
            );
        }

        ChatResponse {
            message: Message::assistant(ollama_resp.message.content),
            usage,
            metadata,
        }
    }
}

#[async_trait]
impl ChatModel for OllamaClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/api/chat", self.config.base_url);
        let body = self.build_body(&request);
        debug!(model = %self.config.model, "Sending Ollama chat request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(format!("{:?}", self.config.timeout))
                } else if e.is_connect() {
                    LlmError::ServiceUnavailable(format!(
                        "Ollama not reachable at {}",
                        self.config.base_url
                    ))
                } else {
                    LlmError::HttpError(e)
                }
            })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("Ollama", status, error_text));
        }

        let ollama_resp: OllamaResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        Ok(self.convert_response(ollama_resp))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn is_available(&self) -> Result<bool> {
        Ok(self.check_health().await)
    }
}

// Ollama API types
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<HashMap<&'static str, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct OllamaResponse {
    model: String,
    message: OllamaMessage,
    #[serde(default)]
    total_duration: Option<u64>,
    #[serde(default)]
    prompt_eval_count: Option<usize>,
    #[serde(default)]
    eval_count: Option<usize>,
}
