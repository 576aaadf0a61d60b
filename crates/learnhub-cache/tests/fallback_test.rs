//! Degradation to the in-process store when Redis cannot be reached.

use std::sync::Arc;
use std::time::Duration;

use serde_json::{Value, json};
use tokio::net::TcpListener;

use learnhub_cache::{BackendKind, CacheManager};
use learnhub_core::config::cache::{CacheConfig, RedisCacheConfig};

/// A manager whose Redis URL points at a closed loopback port.
fn unreachable_manager() -> CacheManager {
    manager_for("redis://127.0.0.1:1")
}

fn manager_for(url: &str) -> CacheManager {
    let config = CacheConfig {
        redis: RedisCacheConfig {
            url: url.to_string(),
            connect_timeout_seconds: 1,
            response_timeout_seconds: 1,
            ..RedisCacheConfig::default()
        },
        ..CacheConfig::default()
    };
    CacheManager::new(&config).expect("valid provider")
}

#[tokio::test]
async fn test_no_connection_before_first_use() {
    let cache = unreachable_manager();
    assert_eq!(cache.connect_attempts(), 0);
}

#[tokio::test]
async fn test_degrades_and_keeps_working() {
    let cache = unreachable_manager();

    assert_eq!(cache.get::<Value>("concept:python:1").await, None);
    assert_eq!(cache.backend_kind().await, BackendKind::Local);
    assert!(cache.is_degraded().await);

    assert!(cache.set("concept:python:1", &json!({"title": "Arrays"})).await);
    assert_eq!(
        cache.get::<Value>("concept:python:1").await,
        Some(json!({"title": "Arrays"}))
    );
    assert_eq!(cache.get::<Value>("concept:python:2").await, None);

    assert_eq!(cache.clear_pattern("concept:python:*").await, 1);
    assert_eq!(cache.get::<Value>("concept:python:1").await, None);

    assert!(cache.set("question:python:1:1", &json!([1, 2, 3])).await);
    assert!(cache.delete("question:python:1:1").await);
    assert!(!cache.delete("question:python:1:1").await);
}

#[tokio::test]
async fn test_never_reconnects_after_degrading() {
    let cache = unreachable_manager();

    for i in 0..20 {
        let key = format!("concept:java:{i}");
        assert!(cache.set(&key, &json!(i)).await);
        assert_eq!(cache.get::<Value>(&key).await, Some(json!(i)));
        assert!(cache.delete(&key).await);
    }
    cache.clear_pattern("*").await;
    let status = cache.status().await;

    assert_eq!(cache.connect_attempts(), 1);
    assert_eq!(status.backend, BackendKind::Local);
    assert!(status.degraded);
    assert!(status.healthy);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_first_access_connects_once() {
    let cache = Arc::new(unreachable_manager());

    let handles: Vec<_> = (0..32)
        .map(|i| {
            let cache = Arc::clone(&cache);
            tokio::spawn(async move {
                let key = format!("concept:cpp:{i}");
                let stored = cache.set(&key, &json!({"chapter": i})).await;
                let read = cache.get::<Value>(&key).await;
                (stored, read, i)
            })
        })
        .collect();

    for handle in handles {
        let (stored, read, i) = handle.await.expect("task panicked");
        assert!(stored);
        assert_eq!(read, Some(json!({"chapter": i})));
    }

    assert_eq!(cache.connect_attempts(), 1);
    assert_eq!(cache.clear_pattern("concept:cpp:*").await, 32);
}

#[tokio::test]
async fn test_ttl_honoured_after_degrading() {
    let cache = unreachable_manager();
    assert!(
        cache
            .set_with_ttl("concept:python:9", &json!(1), Duration::from_millis(100))
            .await
    );
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(cache.get::<Value>("concept:python:9").await, None);
}

/// Accepts TCP connections and never answers, so a Redis handshake hangs
/// until the connect timeout.
async fn silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut open = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            open.push(socket);
        }
    });
    format!("redis://{addr}")
}

#[tokio::test]
async fn test_abandoned_first_access_connects_once() {
    let cache = manager_for(&silent_server().await);

    let abandoned = tokio::time::timeout(
        Duration::from_millis(100),
        cache.get::<Value>("concept:python:1"),
    )
    .await;
    assert!(abandoned.is_err());

    assert_eq!(cache.get::<Value>("concept:python:1").await, None);
    assert_eq!(cache.backend_kind().await, BackendKind::Local);
    assert!(cache.set("concept:python:1", &json!(1)).await);
    assert_eq!(cache.connect_attempts(), 1);
}
