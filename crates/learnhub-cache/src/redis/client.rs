//! Redis connection management.

use std::time::Duration;

use redis::Client;
use redis::aio::ConnectionManager;
use tracing::info;

use learnhub_core::config::cache::RedisCacheConfig;
use learnhub_core::error::{AppError, ErrorKind};
use learnhub_core::result::AppResult;

/// Redis client wrapper with connection management.
#[derive(Debug, Clone)]
pub struct RedisClient {
    /// Redis connection manager (multiplexed, reconnecting).
    conn: ConnectionManager,
    /// Key prefix for all keys.
    key_prefix: String,
    /// Upper bound on every command round-trip.
    response_timeout: Duration,
}

impl RedisClient {
    /// Connect to Redis and verify the server answers a `PING`.
    ///
    /// Connection and probe together are bounded by
    /// `connect_timeout_seconds`.
    pub async fn connect(config: &RedisCacheConfig) -> AppResult<Self> {
        info!(url = %mask_redis_url(&config.url), "Connecting to Redis");

        let client = Client::open(config.url.as_str()).map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to create Redis client", e)
        })?;

        let connect_timeout = Duration::from_secs(config.connect_timeout_seconds);
        let conn = tokio::time::timeout(connect_timeout, Self::open_and_ping(client))
            .await
            .map_err(|_| {
                AppError::cache(format!(
                    "Timed out connecting to Redis after {}s",
                    config.connect_timeout_seconds
                ))
            })??;

        info!("Successfully connected to Redis");
        Ok(Self {
            conn,
            key_prefix: config.key_prefix.clone(),
            response_timeout: Duration::from_secs(config.response_timeout_seconds),
        })
    }

    async fn open_and_ping(client: Client) -> AppResult<ConnectionManager> {
        let mut conn = ConnectionManager::new(client).await.map_err(|e| {
            AppError::with_source(ErrorKind::Cache, "Failed to connect to Redis", e)
        })?;

        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Cache, "Redis PING failed", e))?;

        if pong != "PONG" {
            return Err(AppError::cache(format!(
                "Unexpected PING reply from Redis: {pong}"
            )));
        }
        Ok(conn)
    }

    /// Get a mutable clone of the connection manager.
    pub fn conn_mut(&self) -> ConnectionManager {
        self.conn.clone()
    }

    /// Build a full key with the configured prefix.
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}{key}", self.key_prefix)
    }

    /// Build a full glob pattern with the configured prefix. The prefix is
    /// escaped so it only ever matches itself.
    pub fn prefixed_pattern(&self, pattern: &str) -> String {
        format!("{}{pattern}", crate::pattern::escape(&self.key_prefix))
    }

    /// Whether keys are namespaced under a prefix.
    pub fn has_prefix(&self) -> bool {
        !self.key_prefix.is_empty()
    }

    /// Return the per-command timeout.
    pub fn response_timeout(&self) -> Duration {
        self.response_timeout
    }
}

/// Mask password in Redis URL for safe logging.
pub(crate) fn mask_redis_url(url: &str) -> String {
    if let Some(at_pos) = url.find('@') {
        if let Some(colon_pos) = url[..at_pos].rfind(':') {
            let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
            if colon_pos > scheme_end {
                return format!("{}:****@{}", &url[..colon_pos], &url[at_pos + 1..]);
            }
        }
    }
    url.to_string()
}
