//! Configuration for avaliador
//!
//! The configuration is built once in `main` and passed by reference to the
//! provider factory and the pipeline.

pub mod loader;
pub mod schema;

pub use loader::{ConfigLoader, ConfigOverrides, ENV_PREFIX};
pub use schema::{AvaliadorConfig, LlmConfig, PipelineConfig, ReviewsConfig, OPENAI_API_KEY_ENV};
