//! Environment variable loading utilities

use crate::{Result, ToolingError};
use regex::{Captures, Regex};
use std::env;
use std::str::FromStr;
use std::sync::OnceLock;

/// Read an environment variable.
///
/// * `Ok(Some(value))` if it is set
/// * `Ok(None)` if it is not set
/// * `Err` if it is set but not valid UTF-8
pub fn get_env(key: &str) -> Result<Option<String>> {
    match env::var(key) {
        Ok(val) => Ok(Some(val)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(ToolingError::Env(format!(
            "Environment variable {} contains invalid UTF-8",
            key
        ))),
    }
}

/// Read and parse an environment variable.
///
/// A set-but-unparsable value is an error rather than silently ignored.
///
/// ```rust,ignore
/// let timeout: Option<u64> = get_env_parse("AVALIADOR_TIMEOUT_SECS")?;
/// ```
pub fn get_env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match get_env(key)? {
        Some(val) => {
            let parsed = val.trim().parse::<T>().map_err(|e| {
                ToolingError::Env(format!(
                    "Failed to parse environment variable {}: {}",
                    key, e
                ))
            })?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

/// `build_env_key("AVALIADOR_", "model")` is `AVALIADOR_MODEL`.
pub fn build_env_key(prefix: &str, name: &str) -> String {
    format!("{}{}", prefix, name.to_uppercase())
}

/// Replace `${VAR}` references with the variable's value.
///
/// Unset variables expand to the empty string.
pub fn expand_env_vars(input: &str) -> String {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").ok());

    match pattern {
        Some(re) => re
            .replace_all(input, |caps: &Captures| {
                env::var(&caps[1]).unwrap_or_default()
            })
            .into_owned(),
        None => input.to_string(),
    }
}
