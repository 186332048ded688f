// Completion service - cache, retry and deadline around one backend
// Author: kelexine (https://github.com/kelexine)

use crate::cache::{CacheConfig, ResponseCache};
use crate::config::AppConfig;
use crate::error::{MailError, Result};
use crate::metrics;
use crate::models::{EditRequest, GenerationRequest};
use crate::openai::CompletionBackend;
use crate::prompt::PromptKey;
use crate::utils::retry::RetryPolicy;
use crate::utils::timeout::with_timeout;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Turns prompt keys into generated text for one session.
///
/// Owns the session's response cache and operation counter; the backend is
/// shared. The cache lock is never held across a remote call, so two
/// concurrent misses for one key may both reach the backend and the last
/// writer's entry wins.
pub struct CompletionService {
    backend: Arc<dyn CompletionBackend>,
    retry: RetryPolicy,
    cache: ResponseCache,
    call_timeout: Option<Duration>,
}

impl CompletionService {
    pub fn new(
        backend: Arc<dyn CompletionBackend>,
        retry: RetryPolicy,
        cache: ResponseCache,
        call_timeout: Option<Duration>,
    ) -> Self {
        Self {
            backend,
            retry,
            cache,
            call_timeout,
        }
    }

    /// Build a service with the retry, cache and timeout settings from `config`.
    pub fn from_config(backend: Arc<dyn CompletionBackend>, config: &AppConfig) -> Self {
        Self::new(
            backend,
            RetryPolicy::from(&config.retry),
            ResponseCache::new(CacheConfig::from(&config.cache)),
            config.completion.call_timeout(),
        )
    }

    pub fn cache(&self) -> &ResponseCache {
        &self.cache
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }

    pub fn call_timeout(&self) -> Option<Duration> {
        self.call_timeout
    }

    /// Return the text for `key`, from cache when a live entry exists,
    /// otherwise from the backend under the retry policy.
    ///
    /// Only successes are cached; after exhausted retries the next call for
    /// the same key goes to the backend again.
    pub async fn obtain_completion(&self, api_key: &str, key: &PromptKey) -> Result<String> {
        if let Some(text) = self.cache.get(key).await {
            return Ok(text);
        }

        let prompt = key.prompt();
        let backend = &self.backend;
        let operation_name = format!("{} completion", key.kind());

        let text = self
            .retry
            .run(&operation_name, |attempt| {
                debug!("{} attempt {}", operation_name, attempt);
                backend.complete(api_key, &prompt)
            })
            .await?;

        self.cache.insert(key, text.clone()).await;
        Ok(text)
    }

    /// One user-initiated create or reply cycle.
    pub async fn generate(
        self: &Arc<Self>,
        api_key: &str,
        request: GenerationRequest,
    ) -> Result<String> {
        self.run_cycle(api_key, PromptKey::from(request)).await
    }

    /// One user-initiated edit cycle, cached independently of generation.
    pub async fn edit(self: &Arc<Self>, api_key: &str, request: EditRequest) -> Result<String> {
        self.run_cycle(api_key, PromptKey::from(request)).await
    }

    async fn run_cycle(self: &Arc<Self>, api_key: &str, key: PromptKey) -> Result<String> {
        let kind = key.kind();

        let result = match self.call_timeout {
            Some(limit) => {
                let service = Arc::clone(self);
                let api_key = api_key.to_string();
                with_timeout(limit, async move { service.obtain_completion(&api_key, &key).await })
                    .await
            }
            None => self.obtain_completion(api_key, &key).await,
        };

        // Counted whether the cycle succeeded or not
        if self.cache.record_operation().await {
            info!("Session cache cleared by eviction policy");
        }

        let outcome = match &result {
            Ok(_) => "ok",
            Err(MailError::ExhaustedRetries { .. }) => "exhausted",
            Err(MailError::Timeout(_)) => "timeout",
            Err(_) => "error",
        };
        metrics::record_cycle(kind, outcome);

        if let Err(e) = &result {
            warn!("{} cycle failed: {}", kind, e);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Language;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Echo {
        calls: AtomicU32,
    }

    #[async_trait]
    impl CompletionBackend for Echo {
        async fn complete(&self, _api_key: &str, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("echo: {prompt}"))
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    #[tokio::test]
    async fn test_obtain_completion_caches_success() {
        let backend = Arc::new(Echo {
            calls: AtomicU32::new(0),
        });
        let service = CompletionService::from_config(backend.clone(), &AppConfig::default());
        let key = PromptKey::from(EditRequest {
            original: "Hello".to_string(),
            instruction: "add an emoji".to_string(),
            language: Language::English,
        });

        let first = service.obtain_completion("sk-x", &key).await.unwrap();
        let second = service.obtain_completion("sk-x", &key).await.unwrap();

        assert_eq!(first, second);
        assert!(first.contains("add an emoji"));
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);
        // plain lookups do not count as cycles
        assert_eq!(service.cache().operation_count().await, 0);
    }
}
