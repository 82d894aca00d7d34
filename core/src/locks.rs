// cartsync/src/locks.rs

//! Per-user async mutexes that serialize read-modify-write cycles inside one process.
//!
//! Entries are held weakly: once every guard and waiter for a user is gone the
//! mutex is freed, and the dead map slot is swept on a later acquisition.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{event, Level};

/// Dead entries are swept whenever the map grows past this many slots.
const SWEEP_THRESHOLD: usize = 1024;

pub struct UserLocks {
  slots: Mutex<Slots>,
}

struct Slots {
  by_user: HashMap<String, Weak<AsyncMutex<()>>>,
  sweep_at: usize,
}

/// Held for the duration of one cart operation; releases the user's slot on drop.
pub type UserGuard = OwnedMutexGuard<()>;

impl UserLocks {
  pub fn new() -> Self {
    Self {
      slots: Mutex::new(Slots {
        by_user: HashMap::new(),
        sweep_at: SWEEP_THRESHOLD,
      }),
    }
  }

  /// Waits until no other operation for `user_id` holds the lock.
  pub async fn acquire(&self, user_id: &str) -> UserGuard {
    let mutex = self.mutex_for(user_id);
    mutex.lock_owned().await
  }

  /// Number of users that currently have a live mutex.
  pub fn active(&self) -> usize {
    self
      .slots
      .lock()
      .by_user
      .values()
      .filter(|weak| weak.strong_count() > 0)
      .count()
  }

  fn mutex_for(&self, user_id: &str) -> Arc<AsyncMutex<()>> {
    // Blocking lock, released before the caller awaits the async mutex.
    let mut slots = self.slots.lock();

    if let Some(existing) = slots.by_user.get(user_id).and_then(Weak::upgrade) {
      return existing;
    }

    if slots.by_user.len() >= slots.sweep_at {
      let before = slots.by_user.len();
      slots.by_user.retain(|_, weak| weak.strong_count() > 0);
      slots.sweep_at = std::cmp::max(SWEEP_THRESHOLD, slots.by_user.len() * 2);
      event!(Level::DEBUG, before, after = slots.by_user.len(), "Swept idle user locks.");
    }

    let fresh = Arc::new(AsyncMutex::new(()));
    slots.by_user.insert(user_id.to_string(), Arc::downgrade(&fresh));
    fresh
  }
}

impl Default for UserLocks {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for UserLocks {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("UserLocks").field("active", &self.active()).finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[tokio::test]
  async fn same_user_is_exclusive() {
    let locks = UserLocks::new();
    let guard = locks.acquire("u1").await;

    let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire("u1")).await;
    assert!(blocked.is_err(), "second acquire for the same user should wait");

    drop(guard);
    let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.acquire("u1")).await;
    assert!(reacquired.is_ok());
  }

  #[tokio::test]
  async fn different_users_do_not_contend() {
    let locks = UserLocks::new();
    let _a = locks.acquire("u1").await;
    let b = tokio::time::timeout(Duration::from_millis(50), locks.acquire("u2")).await;
    assert!(b.is_ok());
  }

  #[tokio::test]
  async fn released_users_are_not_active() {
    let locks = UserLocks::new();
    {
      let _g = locks.acquire("u1").await;
      assert_eq!(locks.active(), 1);
    }
    assert_eq!(locks.active(), 0);
  }
}
