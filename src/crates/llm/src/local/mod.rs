//! Providers running on localhost or the local network. No API key needed.
//!
//! - **Ollama** - local model runner.

pub mod ollama;

pub use ollama::OllamaClient;
