//! Redis cache store implementation.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use serde_json::Value;
use tracing::debug;

use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheStore;

use super::client::RedisClient;
use crate::ttl_floor;

/// Keys requested per `SCAN` round-trip.
const SCAN_BATCH: usize = 500;

/// Redis-backed cache store. Values are stored as JSON text with `PSETEX`.
#[derive(Debug, Clone)]
pub struct RedisCacheStore {
    /// Redis client.
    client: RedisClient,
}

impl RedisCacheStore {
    /// Create a new Redis cache store.
    pub fn new(client: RedisClient) -> Self {
        Self { client }
    }

    /// Map a Redis error to an AppError.
    fn map_err(e: redis::RedisError) -> AppError {
        AppError::with_source(ErrorKind::Cache, format!("Redis error: {e}"), e)
    }

    /// Await a Redis command, bounded by the configured response timeout.
    async fn bounded<T>(
        &self,
        command: impl Future<Output = redis::RedisResult<T>>,
    ) -> AppResult<T> {
        let timeout = self.client.response_timeout();
        match tokio::time::timeout(timeout, command).await {
            Ok(result) => result.map_err(Self::map_err),
            Err(_) => Err(AppError::cache(format!(
                "Redis command timed out after {}s",
                timeout.as_secs()
            ))),
        }
    }

    /// Collect every key matching an already-prefixed pattern with `SCAN`.
    async fn scan_keys(&self, full_pattern: &str) -> AppResult<Vec<String>> {
        let mut conn = self.client.conn_mut();
        let mut cursor: u64 = 0;
        let mut keys = Vec::new();

        loop {
            let (next, batch): (u64, Vec<String>) = self
                .bounded(
                    redis::cmd("SCAN")
                        .arg(cursor)
                        .arg("MATCH")
                        .arg(full_pattern)
                        .arg("COUNT")
                        .arg(SCAN_BATCH)
                        .query_async(&mut conn),
                )
                .await?;

            keys.extend(batch);
            if next == 0 {
                break;
            }
            cursor = next;
        }

        // SCAN may return a key more than once.
        keys.sort_unstable();
        keys.dedup();
        Ok(keys)
    }
}

#[async_trait]
impl CacheStore for RedisCacheStore {
    fn name(&self) -> &'static str {
        "redis"
    }

    async fn get(&self, key: &str) -> AppResult<Option<Value>> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let raw: Option<String> = self.bounded(conn.get(&full_key)).await?;

        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> AppResult<()> {
        let full_key = self.client.prefixed_key(key);
        let text = serde_json::to_string(&value)?;
        let millis = u64::try_from(ttl_floor(ttl).as_millis()).unwrap_or(u64::MAX);

        let mut conn = self.client.conn_mut();
        let _: () = self.bounded(conn.pset_ex(&full_key, text, millis)).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> AppResult<bool> {
        let full_key = self.client.prefixed_key(key);
        let mut conn = self.client.conn_mut();
        let removed: u64 = self.bounded(conn.del(&full_key)).await?;
        Ok(removed > 0)
    }

    async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        let full_pattern = self.client.prefixed_pattern(pattern);
        let keys = self.scan_keys(&full_pattern).await?;

        if keys.is_empty() {
            return Ok(0);
        }

        let mut conn = self.client.conn_mut();
        let count: u64 = self.bounded(conn.del(&keys)).await?;

        debug!(pattern, count, "Deleted keys matching pattern");
        Ok(count)
    }

    async fn len(&self) -> AppResult<u64> {
        if !self.client.has_prefix() {
            let mut conn = self.client.conn_mut();
            let size: u64 = self.bounded(redis::cmd("DBSIZE").query_async(&mut conn)).await?;
            return Ok(size);
        }

        let keys = self.scan_keys(&self.client.prefixed_pattern("*")).await?;
        Ok(keys.len() as u64)
    }

    async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self.client.conn_mut();
        let pong: String = self.bounded(redis::cmd("PING").query_async(&mut conn)).await?;
        Ok(pong == "PONG")
    }
}
