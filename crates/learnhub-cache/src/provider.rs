//! Cache manager that selects a backend on first use and dispatches to it.
//!
//! The first operation on a [`CacheManager`] decides, once for the life of
//! the manager, whether entries live in Redis or in the process. When the
//! `redis` provider is configured but the server cannot be reached (or
//! does not answer `PING`), the manager degrades to the in-process store
//! and never tries Redis again.
//!
//! Two layers of operations are exposed:
//!
//! - `try_*` methods return [`AppResult`] so callers can tell a miss
//!   (`Ok(None)`) from a backend failure (`Err`).
//! - The plain methods (`get`, `set`, `delete`, `clear_pattern`) are
//!   best-effort: failures are logged and turned into "absent", `false`
//!   or `0`. Caching is an optimisation, so a caller must treat a miss
//!   exactly like an unavailable cache.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::watch;
use tracing::{info, warn};

use learnhub_core::config::cache::{CacheConfig, PROVIDER_MEMORY, PROVIDER_REDIS};
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;
use learnhub_core::traits::cache::CacheStore;

use crate::memory::MemoryCacheStore;
use crate::redis::{RedisCacheStore, RedisClient};
use crate::redis::client::mask_redis_url;

/// The backing store selected on first access.
#[derive(Debug)]
enum Backend {
    /// Network-backed Redis store.
    Remote(RedisCacheStore),
    /// In-process store, either configured or as a fallback.
    Local(MemoryCacheStore),
}

impl Backend {
    fn store(&self) -> &dyn CacheStore {
        match self {
            Self::Remote(store) => store,
            Self::Local(store) => store,
        }
    }
}

/// Which kind of store is serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Redis.
    Remote,
    /// In-process store.
    Local,
}

/// Snapshot of the cache's health.
#[derive(Debug, Clone, Serialize)]
pub struct CacheStatus {
    /// Store currently serving requests.
    pub backend: BackendKind,
    /// `true` when Redis was configured but unreachable at first use.
    pub degraded: bool,
    /// Whether the store answered a liveness check.
    pub healthy: bool,
    /// Live entry count, if the store could report it.
    pub entries: Option<u64>,
}

/// Cache manager shared by every request handler.
///
/// Construct once, wrap in an `Arc`, and hand clones of the `Arc` around.
/// Backend selection runs in its own task, so it completes even if the
/// caller that started it is dropped; every caller waits on that one task
/// and at most one connection attempt is ever made.
#[derive(Debug)]
pub struct CacheManager {
    config: CacheConfig,
    backend: Arc<OnceLock<Backend>>,
    /// Taken by the first access, which spawns the selection task.
    selection: Mutex<Option<watch::Sender<bool>>>,
    /// Flips to `true` once `backend` is set.
    selected: watch::Receiver<bool>,
    connect_attempts: Arc<AtomicU32>,
}

impl CacheManager {
    /// Create a new cache manager from configuration.
    ///
    /// No connection is made here; the backend is chosen lazily.
    pub fn new(config: &CacheConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            PROVIDER_REDIS | PROVIDER_MEMORY => {
                let (tx, rx) = watch::channel(false);
                Ok(Self {
                    config: config.clone(),
                    backend: Arc::new(OnceLock::new()),
                    selection: Mutex::new(Some(tx)),
                    selected: rx,
                    connect_attempts: Arc::new(AtomicU32::new(0)),
                })
            }
            other => Err(AppError::configuration(format!(
                "Unknown cache provider: '{other}'. Supported: redis, memory"
            ))),
        }
    }

    /// The TTL applied by [`CacheManager::set`].
    pub fn default_ttl(&self) -> Duration {
        Duration::from_secs(self.config.default_ttl_seconds)
    }

    /// Number of Redis connection attempts made so far (never more than one).
    pub fn connect_attempts(&self) -> u32 {
        self.connect_attempts.load(Ordering::SeqCst)
    }

    /// Kind of store serving requests, selecting it if necessary.
    pub async fn backend_kind(&self) -> BackendKind {
        match self.backend().await {
            Backend::Remote(_) => BackendKind::Remote,
            Backend::Local(_) => BackendKind::Local,
        }
    }

    /// Whether the manager fell back to the in-process store because Redis
    /// was unreachable.
    pub async fn is_degraded(&self) -> bool {
        self.config.provider == PROVIDER_REDIS && self.backend_kind().await == BackendKind::Local
    }

    async fn backend(&self) -> &Backend {
        if let Some(backend) = self.backend.get() {
            return backend;
        }

        self.start_selection();
        let mut selected = self.selected.clone();
        let _ = selected.wait_for(|done| *done).await;

        match self.backend.get() {
            Some(backend) => backend,
            None => {
                // The selection task died without reporting (runtime shutdown).
                warn!("Cache backend selection did not complete, using in-process cache");
                self.backend
                    .get_or_init(|| Backend::Local(MemoryCacheStore::new(&self.config.memory)))
            }
        }
    }

    /// Spawn the selection task, unless an earlier access already did.
    fn start_selection(&self) {
        let sender = self
            .selection
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        let Some(sender) = sender else {
            return;
        };

        let config = self.config.clone();
        let backend = Arc::clone(&self.backend);
        let attempts = Arc::clone(&self.connect_attempts);
        tokio::spawn(async move {
            let selected = select_backend(&config, &attempts).await;
            let _ = backend.set(selected);
            sender.send_replace(true);
        });
    }

    // ── Explicit results ───────────────────────────────────

    /// Look up `key` and deserialize it. `Ok(None)` is a miss.
    pub async fn try_get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let store = self.backend().await.store();
        match store.get(key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Serialize `value` and store it under `key` for `ttl`.
    pub async fn try_set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let value = serde_json::to_value(value)?;
        self.backend().await.store().set(key, value, ttl).await
    }

    /// Remove `key`, reporting whether it was present.
    pub async fn try_delete(&self, key: &str) -> AppResult<bool> {
        self.backend().await.store().delete(key).await
    }

    /// Remove every key matching the glob `pattern`, returning the count.
    pub async fn try_clear_pattern(&self, pattern: &str) -> AppResult<u64> {
        self.backend().await.store().delete_pattern(pattern).await
    }

    // ── Best-effort API ────────────────────────────────────

    /// Look up `key`. Misses, undecodable values and backend failures all
    /// yield `None`.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.try_get(key).await.unwrap_or_else(|e| {
            warn!(key, error = %e, "Cache read failed");
            None
        })
    }

    /// Store `value` under `key` with the default TTL.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> bool {
        self.set_with_ttl(key, value, self.default_ttl()).await
    }

    /// Store `value` under `key` for `ttl`. Returns `false` on any failure.
    pub async fn set_with_ttl<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        ttl: Duration,
    ) -> bool {
        match self.try_set(key, value, ttl).await {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "Cache write failed");
                false
            }
        }
    }

    /// Remove `key`. Returns `true` only if an entry was removed.
    pub async fn delete(&self, key: &str) -> bool {
        self.try_delete(key).await.unwrap_or_else(|e| {
            warn!(key, error = %e, "Cache delete failed");
            false
        })
    }

    /// Remove every key matching the glob `pattern`. Returns `0` on failure.
    pub async fn clear_pattern(&self, pattern: &str) -> u64 {
        self.try_clear_pattern(pattern).await.unwrap_or_else(|e| {
            warn!(pattern, error = %e, "Cache pattern clear failed");
            0
        })
    }

    /// Report backend, degradation, liveness and size.
    pub async fn status(&self) -> CacheStatus {
        let store = self.backend().await.store();
        let healthy = store.health_check().await.unwrap_or_else(|e| {
            warn!(store = store.name(), error = %e, "Cache health check failed");
            false
        });
        let entries = match store.len().await {
            Ok(n) => Some(n),
            Err(e) => {
                warn!(store = store.name(), error = %e, "Cache size query failed");
                None
            }
        };

        CacheStatus {
            backend: self.backend_kind().await,
            degraded: self.is_degraded().await,
            healthy,
            entries,
        }
    }
}

/// Choose the store for the life of the manager.
async fn select_backend(config: &CacheConfig, attempts: &AtomicU32) -> Backend {
    if config.provider == PROVIDER_MEMORY {
        let store = MemoryCacheStore::new(&config.memory);
        info!(store = store.name(), "Initializing in-process cache store");
        return Backend::Local(store);
    }

    attempts.fetch_add(1, Ordering::SeqCst);
    match RedisClient::connect(&config.redis).await {
        Ok(client) => {
            let store = RedisCacheStore::new(client);
            info!(store = store.name(), "Initializing Redis cache store");
            Backend::Remote(store)
        }
        Err(e) => {
            let store = MemoryCacheStore::new(&config.memory);
            warn!(
                url = %mask_redis_url(&config.redis.url),
                store = store.name(),
                error = %e,
                "Redis unavailable, using in-process cache for the rest of this process"
            );
            Backend::Local(store)
        }
    }
}
