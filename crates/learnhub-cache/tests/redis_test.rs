//! Tests against a live Redis server.
//!
//! Run with `REDIS_URL=redis://localhost:6379 cargo test -- --ignored`.
//! Each test namespaces its keys under a unique prefix so runs do not
//! interfere with each other or with other data in the database.

use std::time::Duration;

use serde_json::{Value, json};

use learnhub_cache::{BackendKind, CacheManager};
use learnhub_core::config::cache::{CacheConfig, RedisCacheConfig};

async fn redis_manager(test: &str) -> CacheManager {
    let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let config = CacheConfig {
        redis: RedisCacheConfig {
            url,
            key_prefix: format!("learnhub-test:{test}:{nonce}:"),
            ..RedisCacheConfig::default()
        },
        ..CacheConfig::default()
    };
    let cache = CacheManager::new(&config).unwrap();
    assert_eq!(
        cache.backend_kind().await,
        BackendKind::Remote,
        "Redis is not reachable"
    );
    cache
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_roundtrip_preserves_structure() {
    let cache = redis_manager("roundtrip").await;
    let value = json!({
        "title": "Arrays",
        "objectives": ["index", "slice"],
        "duration": 2.5,
        "published": true,
        "notes": null,
        "nested": {"depth": [1, [2, [3]]]}
    });

    assert!(cache.set("concept:python:1", &value).await);
    assert_eq!(cache.get::<Value>("concept:python:1").await, Some(value));
    assert_eq!(cache.get::<Value>("concept:python:2").await, None);
    cache.clear_pattern("*").await;
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_delete_and_clear_pattern() {
    let cache = redis_manager("delete").await;

    assert!(cache.set("concept:python:1", &json!({"title": "Arrays"})).await);
    assert!(cache.set("concept:python:2", &json!({"title": "Lists"})).await);
    assert!(cache.set("concept:java:1", &json!({"title": "Arrays"})).await);

    assert!(cache.delete("concept:python:2").await);
    assert!(!cache.delete("concept:python:2").await);

    assert_eq!(cache.clear_pattern("concept:python:*").await, 1);
    assert_eq!(cache.get::<Value>("concept:python:1").await, None);
    assert!(cache.get::<Value>("concept:java:1").await.is_some());

    let status = cache.status().await;
    assert!(status.healthy);
    assert!(!status.degraded);
    assert_eq!(status.entries, Some(1));

    cache.clear_pattern("*").await;
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_entry_expires() {
    let cache = redis_manager("ttl").await;

    assert!(
        cache
            .set_with_ttl("concept:python:1", &json!(1), Duration::from_secs(1))
            .await
    );
    assert!(cache.get::<Value>("concept:python:1").await.is_some());

    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert_eq!(cache.get::<Value>("concept:python:1").await, None);
}

#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_sub_second_ttl_is_not_rounded_up() {
    let cache = redis_manager("ttl-ms").await;

    assert!(
        cache
            .set_with_ttl("concept:python:1", &json!(1), Duration::from_millis(200))
            .await
    );
    assert!(cache.set_with_ttl("concept:python:2", &json!(2), Duration::ZERO).await);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(cache.get::<Value>("concept:python:1").await, None);
    assert_eq!(cache.get::<Value>("concept:python:2").await, None);
}
