// cartsync/src/store/mod.rs

//! The key-value store port the repository writes through, and its adapters.

mod memory;
#[cfg(feature = "redis-store")]
mod redis_store;

pub use memory::MemoryStore;
#[cfg(feature = "redis-store")]
pub use redis_store::RedisStore;

use crate::error::StoreError;
use async_trait::async_trait;
use std::time::Duration;

/// A get / set-with-expiry string store, safe for concurrent use.
///
/// Implementations are shared behind `Arc<dyn CartStore>` and must bound every
/// call; none may block indefinitely.
#[async_trait]
pub trait CartStore: Send + Sync {
  /// Returns `Ok(None)` when the key is absent or has expired.
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

  /// Unconditionally overwrites `key`, expiring it `ttl` from now.
  async fn set_with_expiry(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError>;

  /// Connectivity check used at startup.
  async fn ping(&self) -> Result<(), StoreError>;
}
