//! Structured logging and secret redaction.
//!
//! This module configures the `tracing` ecosystem for the application and
//! provides a filter that keeps OpenAI API keys out of log sinks.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use crate::config::LoggingConfig;
use crate::error::{MailError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initializes the global tracing subscriber for the application.
///
/// Supports three output formats:
/// - `json`: Structured JSON logs for production ingestion.
/// - `compact`: Single-line output.
/// - `pretty` (default): Human-readable, colorized output for development.
///
/// Logs go to stderr so one-shot commands keep stdout for the message.
/// Log levels are controlled via the `RUST_LOG` environment variable or
/// the provided `LoggingConfig`.
pub fn init(config: &LoggingConfig) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(env_filter);

    let installed = match config.format.as_str() {
        "json" => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        "compact" => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
        _ => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| MailError::Internal(format!("Failed to install logger: {}", e)))
}

// OpenAI secret keys: sk-..., sk-proj-..., sk-svcacct-...
static API_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"sk-[A-Za-z0-9_\-]{8,}").expect("valid api key regex"));

static BEARER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)bearer\s+[^\s\x22']+").expect("valid bearer regex"));

/// Sanitizes sensitive information from log messages.
///
/// Replaces OpenAI API keys and bearer tokens with placeholders so that
/// upstream error bodies can be logged verbatim.
pub fn sanitize(input: &str) -> String {
    let redacted = API_KEY_PATTERN.replace_all(input, "[REDACTED_API_KEY]");
    BEARER_PATTERN
        .replace_all(&redacted, "Bearer [REDACTED]")
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_api_key() {
        let input = "Incorrect API key provided: sk-proj-abc123DEF456ghi789.";
        let output = sanitize(input);
        assert!(output.contains("[REDACTED_API_KEY]"));
        assert!(!output.contains("abc123DEF456"));
    }

    #[test]
    fn test_sanitize_bearer_header() {
        let input = "Authorization: Bearer some.opaque-token";
        let output = sanitize(input);
        assert_eq!(output, "Authorization: Bearer [REDACTED]");
    }

    #[test]
    fn test_sanitize_leaves_plain_text() {
        let input = "The model `gpt-3.5-turbo` does not exist";
        assert_eq!(sanitize(input), input);
    }
}
