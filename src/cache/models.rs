//! Cache configuration, entry and statistics models.

// Author: kelexine (https://github.com/kelexine)

use crate::config::CacheSettings;
use std::time::Duration;
use tokio::time::Instant;

/// Configuration for the response cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Whether caching is enabled.
    pub enabled: bool,
    /// How long an entry stays live after it was written.
    pub ttl: Duration,
    /// Number of user-initiated cycles after which the whole cache is dropped.
    pub clear_every: u32,
}

impl Default for CacheConfig {
    /// Provides default values for cache configuration.
    ///
    /// - `enabled`: true
    /// - `ttl`: 1 hour
    /// - `clear_every`: 10
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(3600),
            clear_every: 10,
        }
    }
}

impl From<&CacheSettings> for CacheConfig {
    fn from(settings: &CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            ttl: settings.ttl(),
            clear_every: settings.clear_every,
        }
    }
}

/// A completed response and the moment it was stored.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub text: String,
    pub stored_at: Instant,
}

impl CacheEntry {
    pub fn new(text: String) -> Self {
        Self {
            text,
            stored_at: Instant::now(),
        }
    }

    pub fn is_live(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

/// Statistics for cache operations.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CacheStats {
    /// Number of successful cache hits.
    pub hits: u64,
    /// Number of cache misses, expired entries included.
    pub misses: u64,
    /// Number of responses written to the cache.
    pub stores: u64,
    /// Number of full clears triggered by the eviction policy.
    pub clears: u64,
}
