//! Error types for reasoning-service clients.

use thiserror::Error;

/// Result type for reasoning-service operations.
pub type Result<T> = std::result::Result<T, LlmError>;

/// Errors raised while talking to a reasoning service.
#[derive(Debug, Error)]
pub enum LlmError {
    /// Transport-level failure.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// HTTP 401/403 from the provider.
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    #[error("API key not found: {0}")]
    ApiKeyNotFound(String),

    /// Local server not running or remote endpoint down.
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// The provider answered but the body was not what we expected
    /// (no choices, undecodable JSON).
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Request timeout: {0}")]
    Timeout(String),

    /// Any other non-success status.
    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl LlmError {
    /// Whether asking again may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::HttpError(_)
                | LlmError::ServiceUnavailable(_)
                | LlmError::Timeout(_)
                | LlmError::RateLimitExceeded(_)
                | LlmError::InvalidResponse(_)
        )
    }

    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            LlmError::AuthenticationError(_) | LlmError::ApiKeyNotFound(_)
        )
    }

    /// Map a non-success HTTP status to the matching variant.
    pub fn from_status(provider: &str, status: u16, body: String) -> Self {
        match status {
            401 | 403 => LlmError::AuthenticationError(body),
            429 => LlmError::RateLimitExceeded(body),
            502..=504 => LlmError::ServiceUnavailable(format!("{} returned {}: {}", provider, status, body)),
            _ => LlmError::ProviderError(format!("{} API error {}: {}", provider, status, body)),
        }
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}
