//! Reasoning-service clients for avaliador.
//!
//! The pipeline treats every reasoning service as a black box that accepts a
//! conversation and returns free text. This crate provides that contract as
//! the [`ChatModel`] trait plus two concrete providers:
//!
//! - **OpenAI** (remote, [`remote::OpenAiClient`]) - also usable with
//!   OpenAI-compatible gateways through `base_url`.
//! - **Ollama** (local, [`local::OllamaClient`]).
//!
//! # Example
//!
//! ```rust,ignore
//! use llm::remote::OpenAiClient;
//! use llm::{ChatModel, ChatRequest, Message, RemoteLlmConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RemoteLlmConfig::from_env(
//!         "OPENAI_API_KEY",
//!         "https://api.openai.com/v1",
//!         "gpt-3.5-turbo",
//!     )?;
//!     let client = OpenAiClient::new(config)?;
//!
//!     let request = ChatRequest::new(vec![
//!         Message::system("Retorne APENAS a chamada de função sugerida."),
//!         Message::human("Qual é a avaliação do Estação Barão?"),
//!     ])
//!     .with_temperature(0.3);
//!
//!     let response = client.chat(request).await?;
//!     println!("{}", response.text());
//!     Ok(())
//! }
//! ```

pub mod chat;
pub mod config;
pub mod error;

#[cfg(feature = "local")]
pub mod local;

#[cfg(feature = "remote")]
pub mod remote;

pub use chat::{ChatConfig, ChatModel, ChatRequest, ChatResponse, Message, MessageRole, UsageMetadata};
pub use config::{LocalLlmConfig, RemoteLlmConfig};
pub use error::{LlmError, Result};
