// cartsync/src/store/memory.rs

use crate::clock::{Clock, SystemClock};
use crate::error::StoreError;
use crate::store::CartStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{event, Level};

#[derive(Debug, Clone)]
struct Entry {
  value: String,
  expires_at: DateTime<Utc>,
}

/// In-process store with per-key expiry, read against an injected clock.
///
/// Expired entries are dropped lazily when read. The lock is never held across an await.
pub struct MemoryStore {
  entries: Mutex<HashMap<String, Entry>>,
  clock: Arc<dyn Clock>,
}

impl MemoryStore {
  pub fn new(clock: Arc<dyn Clock>) -> Self {
    Self {
      entries: Mutex::new(HashMap::new()),
      clock,
    }
  }

  /// Number of live (unexpired) keys.
  pub fn len(&self) -> usize {
    let now = self.clock.now();
    self.entries.lock().values().filter(|e| e.expires_at > now).count()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Raw stored value, bypassing expiry. For inspecting what was written.
  pub fn raw(&self, key: &str) -> Option<String> {
    self.entries.lock().get(key).map(|e| e.value.clone())
  }
}

impl Default for MemoryStore {
  fn default() -> Self {
    Self::new(Arc::new(SystemClock))
  }
}

impl std::fmt::Debug for MemoryStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("MemoryStore")
      .field("keys", &self.entries.lock().len())
      .finish()
  }
}

#[async_trait]
impl CartStore for MemoryStore {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let now = self.clock.now();
    let mut entries = self.entries.lock();
    match entries.get(key).map(|e| e.expires_at > now) {
      Some(true) => Ok(entries.get(key).map(|e| e.value.clone())),
      Some(false) => {
        event!(Level::DEBUG, key, "Entry expired, evicting.");
        entries.remove(key);
        Ok(None)
      }
      None => Ok(None),
    }
  }

  async fn set_with_expiry(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
    let ttl = chrono::Duration::from_std(ttl).map_err(|e| StoreError::backend("set_with_expiry", e))?;
    let expires_at = self.clock.now() + ttl;
    self
      .entries
      .lock()
      .insert(key.to_string(), Entry { value, expires_at });
    Ok(())
  }

  async fn ping(&self) -> Result<(), StoreError> {
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::clock::ManualClock;

  #[tokio::test]
  async fn absent_key_is_none() {
    let store = MemoryStore::default();
    assert_eq!(store.get("cart:nobody").await.unwrap(), None);
  }

  #[tokio::test]
  async fn entries_expire_after_ttl() {
    let clock = Arc::new(ManualClock::default());
    let store = MemoryStore::new(clock.clone());

    store
      .set_with_expiry("k", "v".to_string(), Duration::from_secs(60))
      .await
      .unwrap();
    clock.advance(chrono::Duration::seconds(59));
    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v"));

    clock.advance(chrono::Duration::seconds(1));
    assert_eq!(store.get("k").await.unwrap(), None);
    assert!(store.is_empty());
  }

  #[tokio::test]
  async fn overwrite_resets_expiry() {
    let clock = Arc::new(ManualClock::default());
    let store = MemoryStore::new(clock.clone());
    let ttl = Duration::from_secs(60);

    store.set_with_expiry("k", "v1".to_string(), ttl).await.unwrap();
    clock.advance(chrono::Duration::seconds(50));
    store.set_with_expiry("k", "v2".to_string(), ttl).await.unwrap();
    clock.advance(chrono::Duration::seconds(50));

    assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
  }
}
