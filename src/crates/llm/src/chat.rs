//! Provider-agnostic chat types and the [`ChatModel`] trait.
//!
//! A reasoning service is anything that takes a list of messages and answers
//! with free text. Concrete providers live in [`crate::remote`] and
//! [`crate::local`]; tests plug in their own scripted implementations.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Role of a message sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Instructions that frame the whole conversation.
    System,
    /// Input coming from the orchestrator on behalf of the user.
    Human,
    /// Text produced by the reasoning service.
    Assistant,
}

impl MessageRole {
    /// Wire name used by OpenAI-style chat APIs.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::Human => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single text message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: MessageRole,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Message {
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    pub fn human(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Human, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Attach a participant name (e.g. the agent that produced the message).
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn text(&self) -> &str {
        &self.content
    }
}

/// Generation parameters. Providers ignore the ones they do not support.
#[derive(Debug, Clone, Default)]
pub struct ChatConfig {
    pub temperature: Option<f32>,
    pub max_tokens: Option<usize>,
    pub stop_sequences: Vec<String>,
}

/// Messages plus generation parameters.
///
/// ```rust
/// use llm::{ChatRequest, Message};
///
/// let request = ChatRequest::new(vec![
///     Message::system("Return only the function call."),
///     Message::human("Qual é a avaliação do Estação Barão?"),
/// ])
/// .with_temperature(0.3);
///
/// assert_eq!(request.messages.len(), 2);
/// assert_eq!(request.config.temperature, Some(0.3));
/// ```
#[derive(Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub config: ChatConfig,
}

impl ChatRequest {
    pub fn new(messages: Vec<Message>) -> Self {
        Self {
            messages,
            config: ChatConfig::default(),
        }
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.config.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.config.stop_sequences = sequences;
        self
    }
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct UsageMetadata {
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub total_tokens: usize,
}

impl UsageMetadata {
    pub fn new(input_tokens: usize, output_tokens: usize) -> Self {
        Self {
            input_tokens,
            output_tokens,
            total_tokens: input_tokens + output_tokens,
        }
    }
}

/// Reply of a reasoning service.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    pub message: Message,
    pub usage: Option<UsageMetadata>,
    /// Provider-specific extras (model name, finish reason, timings).
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ChatResponse {
    /// Build a response carrying only assistant text.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            message: Message::assistant(text),
            usage: None,
            metadata: HashMap::new(),
        }
    }

    pub fn text(&self) -> &str {
        self.message.text()
    }
}

/// A black-box reasoning service: text prompt in, free text out.
///
/// Implementations must be `Send + Sync`; the pipeline shares them as
/// `Arc<dyn ChatModel>`.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send the conversation and wait for the complete reply.
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse>;

    /// Model identifier, used in logs.
    fn model_name(&self) -> &str;

    /// Whether the service looks reachable. Defaults to `true`.
    async fn is_available(&self) -> Result<bool> {
        Ok(true)
    }
}
