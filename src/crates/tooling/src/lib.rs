//! Shared helpers for the avaliador workspace.
//!
//! # Modules
//!
//! - `config` - Environment variable loading and `${VAR}` interpolation
//! - `async_utils` - Timeout wrapper for reasoning-service round-trips
//! - `logging` - Subscriber setup, timing and log sanitization

pub mod async_utils;
pub mod config;
pub mod logging;

use thiserror::Error;

/// Errors that can occur in the tooling crate
#[derive(Debug, Error)]
pub enum ToolingError {
    /// Environment variable present but unusable
    #[error("Environment error: {0}")]
    Env(String),

    /// Tracing subscriber could not be installed
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Result type for tooling operations
pub type Result<T> = std::result::Result<T, ToolingError>;
