//! Configuration data structures for mailslayer.
//!
//! This module defines the schema for the application settings, including
//! server parameters, the OpenAI connection, and the retry, cache and
//! timeout policies wrapped around each completion call.
//!
//! Author: kelexine (<https://github.com/kelexine>)

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// The root configuration object for the application.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    /// HTTP server settings (host, port).
    #[serde(default)]
    pub server: ServerConfig,

    /// Upstream OpenAI API settings.
    #[serde(default)]
    pub openai: OpenAiConfig,

    /// Retry policy for individual completion calls.
    #[serde(default)]
    pub retry: RetryConfig,

    /// Response cache settings.
    #[serde(default)]
    pub cache: CacheSettings,

    /// Settings for a whole generation or edit cycle.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// Lifetime of server-side sessions.
    #[serde(default)]
    pub session: SessionConfig,

    /// Logging and observability settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Settings for the built-in HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The IP address or hostname the server should bind to.
    /// Default: `127.0.0.1`
    #[serde(default = "default_host")]
    pub host: String,

    /// The port number the server should listen on.
    /// Default: `8080`
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Settings for the upstream OpenAI API connection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Base URL for the OpenAI API.
    /// Default: `https://api.openai.com/v1`
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Model used for every completion.
    /// Default: `gpt-3.5-turbo`
    #[serde(default = "default_model")]
    pub model: String,

    /// Per-attempt HTTP timeout in seconds.
    /// Default: `60`
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

/// Fixed-delay retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per completion, first call included.
    /// Default: `3`
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds. Never grows.
    /// Default: `1000`
    #[serde(default = "default_retry_delay")]
    pub delay_ms: u64,
}

/// Settings for the per-session response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    /// Whether completed responses are cached at all.
    /// Default: `true`
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Seconds a cached response stays live after it was written.
    /// Default: `3600`
    #[serde(default = "default_ttl")]
    pub ttl_seconds: u64,

    /// The whole cache is dropped once more than this many cycles ran.
    /// Default: `10`
    #[serde(default = "default_clear_every")]
    pub clear_every: u32,
}

/// Settings for a whole generation or edit cycle.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CompletionConfig {
    /// Wall-clock limit for a cycle including its retries. Unset means the
    /// caller waits for the retry policy to finish.
    #[serde(default)]
    pub call_timeout_seconds: Option<u64>,
}

/// Lifetime of sessions held by the HTTP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// A session unused for this many seconds is closed, dropping its key
    /// and cache.
    /// Default: `3600`
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_seconds: u64,

    /// How often the server sweeps idle sessions, in seconds.
    /// Default: `60`
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_seconds: u64,
}

/// Settings for application logging and output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Minimum log level (`trace`, `debug`, `info`, `warn`, `error`).
    /// Default: `info`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format for logs (`pretty`, `json`, `compact`).
    /// Default: `pretty`
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl RetryConfig {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds)
    }
}

impl SessionConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_seconds)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_seconds.max(1))
    }
}

impl CompletionConfig {
    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout_seconds.map(Duration::from_secs)
    }
}

// Default trait implementations linking to custom logic

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            model: default_model(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            delay_ms: default_retry_delay(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: default_ttl(),
            clear_every: default_clear_every(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: default_idle_timeout(),
            sweep_interval_seconds: default_sweep_interval(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// Helper functions for serde defaults and shared constants
fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_request_timeout() -> u64 {
    60
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

fn default_ttl() -> u64 {
    3600 // 1 hour
}

fn default_clear_every() -> u32 {
    10
}

fn default_idle_timeout() -> u64 {
    3600
}

fn default_sweep_interval() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}
