//! Hosted reasoning-service providers.
//!
//! - **OpenAI** - `gpt-3.5-turbo`, `gpt-4o-mini` and any server speaking
//!   the `/chat/completions` contract.

pub mod openai;

pub use openai::OpenAiClient;
