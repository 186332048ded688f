// Response cache module
// Author: kelexine (https://github.com/kelexine)

pub mod eviction;
pub mod manager;
pub mod models;

pub use eviction::{EvictionPolicy, PeriodicClear};
pub use manager::ResponseCache;
pub use models::{CacheConfig, CacheEntry, CacheStats};
