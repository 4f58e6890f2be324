//! Error types for avaliador
//!
//! Stage-level failures (no name, no reviews, unparseable analysis, failed
//! scoring) are not errors: they are [`crate::PipelineOutcome`] variants.
//! `AvaliadorError` covers what the pipeline cannot express as an outcome.

use thiserror::Error;

/// Result type alias for avaliador operations
pub type Result<T> = std::result::Result<T, AvaliadorError>;

/// Main error type for avaliador operations
#[derive(Debug, Error)]
pub enum AvaliadorError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Review corpus exists but could not be read
    #[error("Review store error: {0}")]
    Reviews(String),

    /// Reasoning-service client could not be built, or the service
    /// failed in a way no retry can fix
    #[error("LLM error: {0}")]
    Llm(#[from] llm::LlmError),
}

impl From<tooling::ToolingError> for AvaliadorError {
    fn from(err: tooling::ToolingError) -> Self {
        Self::Config(err.to_string())
    }
}

impl From<toml::de::Error> for AvaliadorError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(format!("Failed to parse config: {}", err))
    }
}
