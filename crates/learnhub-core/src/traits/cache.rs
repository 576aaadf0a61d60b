//! Cache store trait for pluggable caching backends.

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::result::AppResult;

/// Trait for cache backends (Redis or in-process).
///
/// Values are JSON documents. Each store is responsible for its own
/// encoding, key prefixing and TTL enforcement. `Ok(None)` is a miss;
/// `Err` means the store itself failed.
#[async_trait]
pub trait CacheStore: Send + Sync + std::fmt::Debug + 'static {
    /// Short backend name used in logs and status output.
    fn name(&self) -> &'static str;

    /// Get a value by key. Returns `None` if the key does not exist or has expired.
    async fn get(&self, key: &str) -> AppResult<Option<Value>>;

    /// Set a value that expires after `ttl`.
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> AppResult<()>;

    /// Delete a key. Returns `true` if an entry was removed.
    async fn delete(&self, key: &str) -> AppResult<bool>;

    /// Delete all keys matching a glob pattern (e.g., `"concept:python:*"`).
    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64>;

    /// Number of live entries held by this store.
    async fn len(&self) -> AppResult<u64>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}
