//! In-process cache implementation using the moka crate.

use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use moka::Expiry;
use moka::future::Cache;
use moka::policy::EvictionPolicy;
use serde_json::Value;
use tracing::debug;

use learnhub_core::config::cache::MemoryCacheConfig;
use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheStore;

use crate::{pattern, ttl_floor};

/// A cached document together with the lifetime it was stored with.
#[derive(Debug, Clone)]
struct StoredEntry {
    value: Arc<Value>,
    ttl: Duration,
}

/// Expires each entry after the TTL it was inserted with.
struct PerEntryTtl;

impl Expiry<String, StoredEntry> for PerEntryTtl {
    fn expire_after_create(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(ttl_floor(entry.ttl))
    }

    fn expire_after_update(
        &self,
        _key: &String,
        entry: &StoredEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Some(ttl_floor(entry.ttl))
    }
}

/// In-process cache store backed by a bounded moka cache.
///
/// Entries honour their per-call TTL and the store never grows past
/// `max_capacity`; the least recently used entries are evicted first.
#[derive(Debug, Clone)]
pub struct MemoryCacheStore {
    cache: Cache<String, StoredEntry>,
}

impl MemoryCacheStore {
    /// Create a new in-process store from configuration.
    pub fn new(config: &MemoryCacheConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.max_capacity)
            .eviction_policy(EvictionPolicy::lru())
            .expire_after(PerEntryTtl)
            .build();

        Self { cache }
    }

    /// Flush pending evictions and expirations so counts are exact.
    pub async fn sync(&self) {
        self.cache.run_pending_tasks().await;
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        Ok(self
            .cache
            .get(key)
            .await
            .map(|entry| entry.value.as_ref().clone()))
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> AppResult<()> {
        let entry = StoredEntry {
            value: Arc::new(value),
            ttl,
        };
        self.cache.insert(key.to_string(), entry).await;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        // Collect first; removing while iterating would skip entries.
        let keys_to_remove: Vec<String> = self
            .cache
            .iter()
            .filter(|(key, _)| pattern::matches(pattern, key))
            .map(|(key, _)| key.to_string())
            .collect();

        let mut count = 0u64;
        for key in keys_to_remove {
            if self.cache.remove(&key).await.is_some() {
                count += 1;
            }
        }

        debug!(pattern, count, "Deleted keys matching pattern");
        Ok(count)
    }

    async fn len(&self) -> AppResult<u64> {
        self.sync().await;
        Ok(self.cache.entry_count())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_store(max_capacity: u64) -> MemoryCacheStore {
        MemoryCacheStore::new(&MemoryCacheConfig { max_capacity })
    }

    const HOUR: Duration = Duration::from_secs(3600);

    #[tokio::test]
    async fn test_set_get() {
        let store = make_store(100);
        store
            .set("concept:python:1", json!({"title": "Arrays"}), HOUR)
            .await
            .unwrap();
        let value = store.get("concept:python:1").await.unwrap();
        assert_eq!(value, Some(json!({"title": "Arrays"})));
        assert_eq!(store.get("concept:python:2").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_reports_removal_once() {
        let store = make_store(100);
        store.set("k", json!(1), HOUR).await.unwrap();
        assert!(store.delete("k").await.unwrap());
        assert!(!store.delete("k").await.unwrap());
        assert_eq!(store.get("k").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_overwrite_replaces_value() {
        let store = make_store(100);
        store.set("k", json!("old"), HOUR).await.unwrap();
        store.set("k", json!("new"), HOUR).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some(json!("new")));
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_entry_expires_after_ttl() {
        let store = make_store(100);
        store
            .set("short", json!(true), Duration::from_millis(100))
            .await
            .unwrap();
        store.set("long", json!(true), HOUR).await.unwrap();
        assert_eq!(store.get("short").await.unwrap(), Some(json!(true)));

        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(store.get("short").await.unwrap(), None);
        assert_eq!(store.get("long").await.unwrap(), Some(json!(true)));
    }

    #[tokio::test]
    async fn test_zero_ttl_expires_immediately() {
        let store = make_store(100);
        store.set("gone", json!(1), Duration::ZERO).await.unwrap();

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(store.get("gone").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_pattern_uses_glob() {
        let store = make_store(100);
        store.set("concept:python:1", json!(1), HOUR).await.unwrap();
        store.set("concept:python:2", json!(2), HOUR).await.unwrap();
        store.set("concept:java:1", json!(3), HOUR).await.unwrap();
        store.set("question:python:1:1", json!(4), HOUR).await.unwrap();

        let removed = store.delete_pattern("concept:python:*").await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(store.get("concept:python:1").await.unwrap(), None);
        assert_eq!(store.get("concept:java:1").await.unwrap(), Some(json!(3)));
        assert_eq!(
            store.get("question:python:1:1").await.unwrap(),
            Some(json!(4))
        );
    }

    #[tokio::test]
    async fn test_delete_pattern_without_matches() {
        let store = make_store(100);
        store.set("concept:python:1", json!(1), HOUR).await.unwrap();
        assert_eq!(store.delete_pattern("question:*").await.unwrap(), 0);
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_capacity_is_bounded() {
        let store = make_store(10);
        for i in 0..50 {
            store.set(&format!("k{i}"), json!(i), HOUR).await.unwrap();
        }
        assert!(store.len().await.unwrap() <= 10);
    }

    #[tokio::test]
    async fn test_health_check() {
        let store = make_store(10);
        assert_eq!(store.name(), "memory");
        assert!(store.health_check().await.unwrap());
    }
}
