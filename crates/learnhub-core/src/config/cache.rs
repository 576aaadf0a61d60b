//! Cache provider configuration.

use serde::{Deserialize, Serialize};

/// Provider name that probes Redis and falls back to the in-process store.
pub const PROVIDER_REDIS: &str = "redis";

/// Provider name that skips Redis entirely.
pub const PROVIDER_MEMORY: &str = "memory";

/// Top-level cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Cache provider type: `"redis"` (with in-process fallback) or `"memory"`.
    #[serde(default = "default_provider")]
    pub provider: String,
    /// Default TTL for cached entries in seconds.
    #[serde(default = "default_ttl")]
    pub default_ttl_seconds: u64,
    /// Redis-specific cache configuration.
    #[serde(default)]
    pub redis: RedisCacheConfig,
    /// In-process cache configuration.
    #[serde(default)]
    pub memory: MemoryCacheConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            provider: default_provider(),
            default_ttl_seconds: default_ttl(),
            redis: RedisCacheConfig::default(),
            memory: MemoryCacheConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Configuration for a purely in-process cache.
    pub fn memory() -> Self {
        Self {
            provider: PROVIDER_MEMORY.to_string(),
            ..Self::default()
        }
    }
}

/// Redis cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisCacheConfig {
    /// Redis connection URL.
    #[serde(default = "default_redis_url")]
    pub url: String,
    /// Prefix prepended to every key and pattern sent to Redis.
    #[serde(default)]
    pub key_prefix: String,
    /// Upper bound on establishing the connection and answering the probe.
    #[serde(default = "default_timeout")]
    pub connect_timeout_seconds: u64,
    /// Upper bound on every individual command.
    #[serde(default = "default_timeout")]
    pub response_timeout_seconds: u64,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: default_redis_url(),
            key_prefix: String::new(),
            connect_timeout_seconds: default_timeout(),
            response_timeout_seconds: default_timeout(),
        }
    }
}

/// In-process cache backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryCacheConfig {
    /// Maximum number of entries kept before least-recently-used eviction.
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

impl Default for MemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: default_max_capacity(),
        }
    }
}

fn default_provider() -> String {
    PROVIDER_REDIS.to_string()
}

fn default_ttl() -> u64 {
    86400
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_timeout() -> u64 {
    5
}

fn default_max_capacity() -> u64 {
    10000
}
