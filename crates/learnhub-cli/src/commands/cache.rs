//! Raw cache CLI commands.

use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tabled::Tabled;

use crate::output::{self, OutputFormat};
use learnhub_cache::{BackendKind, CacheManager};
use learnhub_core::error::AppError;
use learnhub_core::result::AppResult;

/// Status display row
#[derive(Debug, Serialize, Tabled)]
struct StatusRow {
    /// Backend serving requests
    backend: String,
    /// Fell back from Redis
    degraded: bool,
    /// Liveness
    healthy: bool,
    /// Entry count
    entries: String,
    /// Redis connection attempts
    connect_attempts: u32,
}

/// Show backend selection and health
pub async fn status(cache: &CacheManager, format: OutputFormat) -> AppResult<()> {
    let status = cache.status().await;

    if format == OutputFormat::Json {
        output::print_json(&status);
        return Ok(());
    }

    let row = StatusRow {
        backend: match status.backend {
            BackendKind::Remote => "redis".to_string(),
            BackendKind::Local => "memory".to_string(),
        },
        degraded: status.degraded,
        healthy: status.healthy,
        entries: status
            .entries
            .map_or_else(|| "unknown".to_string(), |n| n.to_string()),
        connect_attempts: cache.connect_attempts(),
    };
    output::print_rows(&[row], format);

    if status.degraded {
        output::print_warning("Redis was unreachable; entries live in this process only");
    }
    Ok(())
}

/// Print the document stored under `key`
pub async fn get(cache: &CacheManager, key: &str) -> AppResult<()> {
    match cache.try_get::<Value>(key).await? {
        Some(value) => {
            output::print_json(&value);
            Ok(())
        }
        None => Err(AppError::not_found(format!("Key '{key}' not found"))),
    }
}

/// Store a JSON document under `key`
pub async fn set(
    cache: &CacheManager,
    key: &str,
    raw: &str,
    ttl_seconds: Option<u64>,
    format: OutputFormat,
) -> AppResult<()> {
    let value: Value = serde_json::from_str(raw)?;
    let ttl = ttl_seconds.map_or_else(|| cache.default_ttl(), Duration::from_secs);

    cache.try_set(key, &value, ttl).await?;
    output::print_success(
        &format!("Stored '{key}' for {}s", ttl.as_secs()),
        format,
    );
    Ok(())
}

/// Remove `key`
pub async fn delete(cache: &CacheManager, key: &str, format: OutputFormat) -> AppResult<()> {
    if cache.try_delete(key).await? {
        output::print_success(&format!("Deleted '{key}'"), format);
    } else {
        output::print_warning(&format!("Key '{key}' was not present"));
    }
    Ok(())
}

/// Remove every key matching `pattern`
pub async fn clear(cache: &CacheManager, pattern: &str, format: OutputFormat) -> AppResult<()> {
    let removed = cache.try_clear_pattern(pattern).await?;
    output::print_success(
        &format!("Removed {removed} entries matching '{pattern}'"),
        format,
    );
    Ok(())
}
