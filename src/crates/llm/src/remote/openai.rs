//! OpenAI chat-completions client.
//!
//! Works against `api.openai.com` and any server exposing the same
//! `/chat/completions` contract.
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::OpenAiClient;
//! use llm::{ChatModel, ChatRequest, Message, RemoteLlmConfig};
//!
//! let config = RemoteLlmConfig::from_env(
//!     "OPENAI_API_KEY",
//!     "https://api.openai.com/v1",
//!     "gpt-3.5-turbo",
//! )?;
//! let client = OpenAiClient::new(config)?;
//!
//! let request = ChatRequest::new(vec![Message::human("Olá!")]).with_temperature(0.3);
//! let response = client.chat(request).await?;
//! ```

use crate::chat::{ChatModel, ChatRequest, ChatResponse, Message, UsageMetadata};
use crate::config::RemoteLlmConfig;
use crate::error::{LlmError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// OpenAI API client.
#[derive(Clone)]
pub struct OpenAiClient {
    config: RemoteLlmConfig,
    client: Client,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("base_url", &self.config.base_url)
            .field("model", &self.config.model)
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(config: RemoteLlmConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { config, client })
    }

    fn convert_message(&self, msg: &Message) -> OpenAiMessage {
        OpenAiMessage {
            role: msg.role.as_str().to_string(),
            content: Some(msg.content.clone()),
            name: msg.name.clone(),
        }
    }

    fn build_body(&self, request: &ChatRequest) -> OpenAiRequest {
        OpenAiRequest {
            model: self.config.model.clone(),
            messages: request
                .messages
                .iter()
                .map(|m| self.convert_message(m))
                .collect(),
            temperature: request.config.temperature,
            max_tokens: request.config.max_tokens,
            stop: if request.config.stop_sequences.is_empty() {
                None
            } else {
                Some(request.config.stop_sequences.clone())
            },
            stream: false,
        }
    }

    fn convert_response(&self, openai_resp: OpenAiResponse) -> Result<ChatResponse> {
        let choice = openai_resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("response contained no choices".to_string()))?;

        let usage = openai_resp
            .usage
            .map(|u| UsageMetadata::new(u.prompt_tokens, u.completion_tokens));

        let mut metadata = HashMap::new();
        metadata.insert(
            "model".to_string(),
            serde_json::Value::String(openai_resp.model),
        );
        metadata.insert(
            "finish_reason".to_string(),
            serde_json::Value::String(choice.finish_reason.unwrap_or_default()),
        );

        Ok(ChatResponse {
            message: Message::assistant(choice.message.content.unwrap_or_default()),
            usage,
            metadata,
        })
    }
}

#[async_trait]
impl ChatModel for OpenAiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", self.config.base_url);
        let body = self.build_body(&request);
        debug!(model = %self.config.model, messages = body.messages.len(), "Sending chat completion");

        let mut req = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&body);

        if let Some(org) = &self.config.organization {
            req = req.header("OpenAI-Organization", org);
        }

        let response = req.send().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout(format!("{:?}", self.config.timeout))
            } else {
                LlmError::HttpError(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let error_text = response.text().await.unwrap_or_default();
            return Err(LlmError::from_status("OpenAI", status, error_text));
        }

        let openai_resp: OpenAiResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(e.to_string()))?;

        self.convert_response(openai_resp)
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn is_available(&self) -> Result<bool> {
        let url = format!("{}/models", self.config.base_url);
        match self
            .client
            .get(&url)
            .bearer_auth(&self.config.api_key)
            .send()
            .await
        {
            Ok(response) => Ok(response.status().is_success()),
            Err(_) => Ok(false),
        }
    }
}

// OpenAI API types
#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop: Option<Vec<String>>,
    stream: bool,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    model: String,
    choices: Vec<OpenAiChoice>,
    usage: Option<OpenAiUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    prompt_tokens: usize,
    completion_tokens: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::MessageRole;
    use std::time::Duration;

    fn client(model: &str) -> OpenAiClient {
        let config = RemoteLlmConfig::new("test-key", "https://api.openai.com/v1", model);
        OpenAiClient::new(config).unwrap()
    }

    #[test]
    fn test_message_conversion_all_roles() {
        let client = client("gpt-3.5-turbo");

        let sys = client.convert_message(&Message::system("Você é um analista"));
        assert_eq!(sys.role, "system");

        let user = client.convert_message(&Message::human("Comida mediana"));
        assert_eq!(user.role, "user");
        assert_eq!(user.content.as_deref(), Some("Comida mediana"));

        let asst = client.convert_message(&Message::assistant("[3], [5]").with_name("review_analyst"));
        assert_eq!(asst.role, "assistant");
        assert_eq!(asst.name.as_deref(), Some("review_analyst"));
    }

    #[test]
    fn test_request_body_serialization() {
        let client = client("gpt-3.5-turbo");
        let request = ChatRequest::new(vec![Message::human("oi")]).with_temperature(0.3);

        let body = serde_json::to_value(client.build_body(&request)).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["stream"], false);
        assert_eq!(body["messages"][0]["role"], "user");
        assert!(body.get("stop").is_none());
        assert!(body.get("max_tokens").is_none());
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_response_conversion() {
        let client = client("gpt-3.5-turbo");
        let raw = r#"{
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "gpt-3.5-turbo-0125",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "fetch_restaurant_data(restaurant_name='Estação Barão')"},
                "finish_reason": "stop"
            }],
            "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
        }"#;
        let parsed: OpenAiResponse = serde_json::from_str(raw).unwrap();

        let response = client.convert_response(parsed).unwrap();
        assert_eq!(response.message.role, MessageRole::Assistant);
        assert_eq!(
            response.text(),
            "fetch_restaurant_data(restaurant_name='Estação Barão')"
        );
        assert_eq!(response.usage.unwrap().total_tokens, 30);
        assert_eq!(response.metadata["finish_reason"], "stop");
    }

    #[test]
    fn test_response_without_choices() {
        let client = client("gpt-3.5-turbo");
        let parsed: OpenAiResponse =
            serde_json::from_str(r#"{"model": "gpt-3.5-turbo", "choices": []}"#).unwrap();

        assert!(matches!(
            client.convert_response(parsed),
            Err(LlmError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_custom_timeout_and_debug_hides_key() {
        let config = RemoteLlmConfig::new("sk-secret", "https://api.openai.com/v1", "gpt-4o-mini")
            .with_timeout(Duration::from_secs(10));
        let client = OpenAiClient::new(config).unwrap();

        assert_eq!(client.config.timeout, Duration::from_secs(10));
        assert_eq!(client.model_name(), "gpt-4o-mini");
        assert!(!format!("{:?}", client).contains("sk-secret"));
    }
}
