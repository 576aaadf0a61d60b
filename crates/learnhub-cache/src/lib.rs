//! # learnhub-cache
//!
//! Best-effort cache for generated learning content. Two stores are
//! available:
//!
//! - **redis**: Redis-backed store using the [redis](https://crates.io/crates/redis) crate
//! - **memory**: bounded in-process store using [moka](https://crates.io/crates/moka)
//!
//! [`CacheManager`] picks one on first use. With the `redis` provider it
//! probes the server and falls back to the in-process store for the rest
//! of the process if the probe fails. Both stores honour per-entry TTLs
//! and interpret `clear_pattern` arguments as Redis globs (see [`pattern`]).

pub mod keys;
pub mod memory;
pub mod pattern;
pub mod provider;
pub mod redis;

pub use provider::{BackendKind, CacheManager, CacheStatus};

use std::time::Duration;

/// Shortest lifetime either store gives an entry. Redis rejects a zero
/// `PSETEX` expiry, so both stores raise shorter TTLs to this.
pub const MIN_TTL: Duration = Duration::from_millis(1);

/// Raise `ttl` to [`MIN_TTL`].
pub(crate) fn ttl_floor(ttl: Duration) -> Duration {
    ttl.max(MIN_TTL)
}
