// Response cache - TTL lookup and periodic clearing
// Author: kelexine (https://github.com/kelexine)

use crate::cache::eviction::{EvictionPolicy, PeriodicClear};
use crate::cache::models::{CacheConfig, CacheEntry, CacheStats};
use crate::metrics;
use crate::prompt::PromptKey;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::debug;

#[derive(Debug)]
struct CacheState {
    /// PromptKey digest → stored response
    entries: HashMap<String, CacheEntry>,
    stats: CacheStats,
    policy: Box<dyn EvictionPolicy>,
}

/// Session-scoped cache of completed responses.
///
/// Entries are keyed by the full argument tuple of a cycle and expire after
/// the configured TTL. Only successful completions are ever stored.
#[derive(Debug)]
pub struct ResponseCache {
    config: CacheConfig,
    state: Mutex<CacheState>,
}

impl ResponseCache {
    /// Create a cache with the default [`PeriodicClear`] policy.
    pub fn new(config: CacheConfig) -> Self {
        let policy = PeriodicClear::new(config.clear_every);
        Self::with_policy(config, Box::new(policy))
    }

    pub fn with_policy(config: CacheConfig, policy: Box<dyn EvictionPolicy>) -> Self {
        Self {
            config,
            state: Mutex::new(CacheState {
                entries: HashMap::new(),
                stats: CacheStats::default(),
                policy,
            }),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Live response for `key`, if any. Stale entries are dropped on access.
    pub async fn get(&self, key: &PromptKey) -> Option<String> {
        if !self.config.enabled {
            return None;
        }

        let digest = key.digest();
        let mut state = self.state.lock().await;

        let live = match state.entries.get(&digest) {
            Some(entry) if entry.is_live(self.config.ttl) => Some(entry.text.clone()),
            Some(_) => {
                debug!("Cache entry expired: {}", &digest[..16]);
                state.entries.remove(&digest);
                metrics::remove_cache_entries(1);
                None
            }
            None => None,
        };

        if live.is_some() {
            debug!("Cache hit: {}", &digest[..16]);
            state.stats.hits += 1;
            metrics::record_cache_hit();
        } else {
            debug!("Cache miss: {}", &digest[..16]);
            state.stats.misses += 1;
            metrics::record_cache_miss();
        }
        live
    }

    /// Store a successful response. A concurrent writer for the same key
    /// simply overwrites the earlier entry.
    pub async fn insert(&self, key: &PromptKey, text: String) {
        if !self.config.enabled {
            return;
        }

        let digest = key.digest();
        let mut state = self.state.lock().await;
        if state.entries.insert(digest, CacheEntry::new(text)).is_none() {
            metrics::add_cache_entries(1);
        }
        state.stats.stores += 1;
        metrics::record_cache_store();
    }

    /// Count one user-initiated cycle against the eviction policy, clearing
    /// the cache when it says so. Returns whether a clear happened.
    pub async fn record_operation(&self) -> bool {
        let mut state = self.state.lock().await;
        if !state.policy.on_operation() {
            return false;
        }

        let dropped = state.entries.len();
        state.entries.clear();
        state.stats.clears += 1;
        metrics::record_cache_clear();
        metrics::remove_cache_entries(dropped);
        debug!("Eviction policy cleared {} cache entries", dropped);
        true
    }

    /// Cycles counted since the last clear.
    pub async fn operation_count(&self) -> u32 {
        self.state.lock().await.policy.operation_count()
    }

    /// Number of stored entries, expired ones included until next accessed.
    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Whether a live entry exists for `key`, without touching statistics.
    pub async fn contains(&self, key: &PromptKey) -> bool {
        let state = self.state.lock().await;
        state
            .entries
            .get(&key.digest())
            .is_some_and(|entry| entry.is_live(self.config.ttl))
    }

    /// Get cache statistics
    pub async fn get_stats(&self) -> CacheStats {
        self.state.lock().await.stats.clone()
    }

    /// Clear all cached entries and restart the cycle count
    pub async fn clear(&self) {
        let mut state = self.state.lock().await;
        let dropped = state.entries.len();
        state.entries.clear();
        state.policy.reset();
        state.stats.clears += 1;
        metrics::record_cache_clear();
        metrics::remove_cache_entries(dropped);
        debug!("Cache cleared");
    }
}

impl Drop for ResponseCache {
    fn drop(&mut self) {
        metrics::remove_cache_entries(self.state.get_mut().entries.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EditRequest, Language};

    fn key(instruction: &str) -> PromptKey {
        PromptKey::from(EditRequest {
            original: "Hi team".to_string(),
            instruction: instruction.to_string(),
            language: Language::English,
        })
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expires_after_ttl() {
        let cache = ResponseCache::new(CacheConfig::default());
        cache.insert(&key("shorter"), "Hi".to_string()).await;

        tokio::time::advance(Duration::from_secs(3599)).await;
        assert_eq!(cache.get(&key("shorter")).await.as_deref(), Some("Hi"));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert_eq!(cache.get(&key("shorter")).await, None);
        assert!(cache.is_empty().await);

        let stats = cache.get_stats().await;
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.stores, 1);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let cache = ResponseCache::new(CacheConfig::default());
        cache.insert(&key("shorter"), "Hi".to_string()).await;

        assert!(cache.contains(&key("shorter")).await);
        assert!(!cache.contains(&key("longer")).await);
        assert_eq!(cache.get(&key("longer")).await, None);
    }

    #[tokio::test]
    async fn test_record_operation_clears_live_entries() {
        let cache = ResponseCache::new(CacheConfig {
            clear_every: 2,
            ..CacheConfig::default()
        });
        cache.insert(&key("a"), "A".to_string()).await;

        assert!(!cache.record_operation().await);
        assert!(!cache.record_operation().await);
        assert_eq!(cache.len().await, 1);

        assert!(cache.record_operation().await);
        assert!(cache.is_empty().await);
        assert_eq!(cache.operation_count().await, 0);
        assert_eq!(cache.get_stats().await.clears, 1);
    }

    #[tokio::test]
    async fn test_disabled_cache_never_stores() {
        let cache = ResponseCache::new(CacheConfig {
            enabled: false,
            ..CacheConfig::default()
        });
        cache.insert(&key("a"), "A".to_string()).await;
        assert!(cache.is_empty().await);
        assert_eq!(cache.get(&key("a")).await, None);
    }
}
