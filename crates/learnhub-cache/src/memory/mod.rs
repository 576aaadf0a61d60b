//! In-process cache store.

pub mod store;

pub use store::MemoryCacheStore;
