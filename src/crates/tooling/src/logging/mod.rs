//! Logging utilities
//!
//! Subscriber setup plus small helpers for structured logging with tracing.
//! Logs always go to stderr; stdout is reserved for program output.

use crate::{Result, ToolingError};
use regex::Regex;
use std::sync::OnceLock;
use std::time::Instant;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` wins when set; otherwise `verbosity` picks the level
/// (0 = warn, 1 = info, 2+ = debug).
pub fn init_tracing(verbosity: u8) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| ToolingError::Logging(e.to_string()))
}

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    }
}

/// Await `future` and log how long it took at debug level.
pub async fn timed<F, T>(name: &str, future: F) -> T
where
    F: std::future::Future<Output = T>,
{
    let start = Instant::now();
    debug!("Starting: {}", name);

    let result = future.await;

    debug!("Completed: {} in {}", name, format_duration(start.elapsed()));
    result
}

/// Format duration in human-readable form
///
/// ```rust
/// use tooling::logging::format_duration;
/// use std::time::Duration;
///
/// assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
/// assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
/// ```
pub fn format_duration(duration: std::time::Duration) -> String {
    let micros = duration.as_micros();

    if micros < 1000 {
        format!("{}μs", micros)
    } else if micros < 1_000_000 {
        format!("{}ms", micros / 1000)
    } else if micros < 60_000_000 {
        format!("{:.2}s", micros as f64 / 1_000_000.0)
    } else {
        let seconds = micros / 1_000_000;
        format!("{}m{}s", seconds / 60, seconds % 60)
    }
}

/// Redact credentials before text reaches the logs.
///
/// ```rust
/// use tooling::logging::sanitize_for_logging;
///
/// let sanitized = sanitize_for_logging("api_key=sk-abc123");
/// assert!(sanitized.contains("[REDACTED]"));
/// ```
pub fn sanitize_for_logging(input: &str) -> String {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    let patterns = PATTERNS.get_or_init(|| {
        [
            (r"(?i)(api[\s_-]?key|apikey)\s*[:=]\s*\S+", "$1: [REDACTED]"),
            (r"(?i)(password|passwd|pwd)\s*[:=]\s*\S+", "$1: [REDACTED]"),
            (r"(?i)(token|secret)\s*[:=]\s*\S+", "$1: [REDACTED]"),
            (r"(?i)(authorization)\s*:\s*bearer\s+\S+", "$1: Bearer [REDACTED]"),
            (r"\bsk-[A-Za-z0-9_-]{8,}", "[REDACTED]"),
        ]
        .into_iter()
        .filter_map(|(pattern, replacement)| Regex::new(pattern).ok().map(|re| (re, replacement)))
        .collect()
    });

    let mut result = input.to_string();
    for (re, replacement) in patterns {
        result = re.replace_all(&result, *replacement).into_owned();
    }
    result
}

/// Shorten long prompts/replies for log lines, on a char boundary.
pub fn truncate_for_log(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}… ({} chars)", &input[..idx], input.chars().count()),
        None => input.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_level_for_verbosity() {
        assert_eq!(level_for_verbosity(0), "warn");
        assert_eq!(level_for_verbosity(1), "info");
        assert_eq!(level_for_verbosity(5), "debug");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_micros(500)), "500μs");
        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_millis(1500)), "1.50s");
        assert_eq!(format_duration(Duration::from_secs(125)), "2m5s");
    }

    #[test]
    fn test_sanitize_api_key() {
        let sanitized = sanitize_for_logging("API key: sk-abc123");
        assert!(sanitized.contains("[REDACTED]"));
        assert!(!sanitized.contains("sk-abc123"));
    }

    #[test]
    fn test_sanitize_bare_openai_key() {
        let sanitized = sanitize_for_logging("using sk-proj-ABCDEFGH12345 now");
        assert_eq!(sanitized, "using [REDACTED] now");
    }

    #[test]
    fn test_sanitize_bearer_token() {
        let sanitized = sanitize_for_logging("Authorization: Bearer abc123xyz");
        assert!(sanitized.contains("[REDACTED]"));
        assert!(!sanitized.contains("abc123xyz"));
    }

    #[test]
    fn test_sanitize_preserves_reviews() {
        let input = "A comida do Estação Barão foi mediana, sem nada particularmente marcante.";
        assert_eq!(sanitize_for_logging(input), input);
    }

    #[test]
    fn test_truncate_for_log() {
        assert_eq!(truncate_for_log("curto", 10), "curto");
        assert_eq!(truncate_for_log("pontuação", 5), "pontu… (9 chars)");
    }

    #[tokio::test]
    async fn test_timed() {
        let result = timed("analysis", async { 42 }).await;
        assert_eq!(result, 42);
    }
}
