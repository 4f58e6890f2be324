//! Environment-driven configuration helpers
//!
//! Config structs elsewhere in the workspace are deserialized from TOML and
//! then overridden from the environment with these helpers.
//!
//! # Example
//!
//! ```rust,ignore
//! use tooling::config::{build_env_key, expand_env_vars, get_env, get_env_parse};
//!
//! let model = get_env(&build_env_key("AVALIADOR_", "model"))?;
//! let attempts: Option<u32> = get_env_parse("AVALIADOR_MAX_ATTEMPTS")?;
//! let key = expand_env_vars("${OPENAI_API_KEY}");
//! ```

mod env;

pub use env::{build_env_key, expand_env_vars, get_env, get_env_parse};
