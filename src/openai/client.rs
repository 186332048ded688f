// OpenAI chat completions client
// Author: kelexine (https://github.com/kelexine)

use super::CompletionBackend;
use crate::config::OpenAiConfig;
use crate::error::{MailError, Result};
use crate::metrics;
use crate::models::openai::{ApiErrorResponse, ChatCompletionRequest, ChatCompletionResponse};
use crate::utils::logging::sanitize;
use async_trait::async_trait;
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::{debug, error};

/// Client for the OpenAI chat completions API.
///
/// Makes exactly one HTTP attempt per call. Every failure (transport error,
/// non-success status, unusable body) is returned to the caller, which owns
/// the retry policy.
#[derive(Clone)]
pub struct OpenAiClient {
    http_client: Client,
    config: OpenAiConfig,
}

impl OpenAiClient {
    /// Create a new client with connection pooling and a per-attempt timeout.
    pub fn new(config: &OpenAiConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_keepalive(Some(Duration::from_secs(60)))
            .use_rustls_tls()
            .build()
            .map_err(|e| MailError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        debug!("Created OpenAI HTTP client for {}", config.api_base_url);

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    /// Get the API base_url
    pub fn base_url(&self) -> &str {
        self.config.api_base_url.trim_end_matches('/')
    }

    /// Extract error message from API response JSON
    fn extract_error_message(response_text: &str) -> Option<String> {
        let parsed: ApiErrorResponse = serde_json::from_str(response_text).ok()?;
        let detail = parsed.error?;
        detail.message.or(detail.error_type)
    }

    async fn send_completion(&self, api_key: &str, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url());
        let request = ChatCompletionRequest::single_user_turn(&self.config.model, prompt);

        debug!("Calling chat completions for model: {}", self.config.model);

        let response = self
            .http_client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            let message = Self::extract_error_message(&response_text)
                .unwrap_or_else(|| response_text.clone());
            error!(
                "OpenAI API error: HTTP {} - {}",
                status,
                sanitize(&message)
            );
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let completion: ChatCompletionResponse = serde_json::from_str(&response_text)
            .map_err(|e| MailError::MalformedResponse(format!("Response parsing error: {}", e)))?;

        if let Some(usage) = &completion.usage {
            debug!(
                "Completion used {} prompt + {} completion tokens",
                usage.prompt_tokens, usage.completion_tokens
            );
        }

        completion
            .first_text()
            .map(str::to_string)
            .ok_or_else(|| {
                MailError::MalformedResponse("Response contained no message text".to_string())
            })
    }

    /// Check that `api_key` is accepted by listing models.
    ///
    /// Returns the round-trip latency.
    pub async fn check_connectivity(&self, api_key: &str) -> Result<Duration> {
        let url = format!("{}/models", self.base_url());
        debug!("Checking connectivity via {}", url);

        let start = Instant::now();
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(5)) // Short timeout for health checks
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = Self::extract_error_message(&error_text).unwrap_or(error_text);
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let latency = start.elapsed();
        debug!("API connectivity check passed in {:?}", latency);
        Ok(latency)
    }
}

#[async_trait]
impl CompletionBackend for OpenAiClient {
    async fn complete(&self, api_key: &str, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let result = self.send_completion(api_key, prompt).await;
        metrics::record_completion_call(
            &self.config.model,
            result.is_ok(),
            start.elapsed().as_secs_f64(),
        );
        result
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
