// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use cartsync::{Caller, CartRepository, CartStore, CartSync, ManualClock, MemoryStore, StoreError, WritePolicy};
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use std::sync::{
  atomic::{AtomicBool, AtomicUsize, Ordering},
  Arc,
};
use std::time::Duration;
use tracing::Level;

pub const TTL: Duration = Duration::from_secs(48 * 60 * 60);

// --- Common Fixture ---
pub struct Fixture {
  pub clock: Arc<ManualClock>,
  pub store: Arc<MemoryStore>,
  pub sync: CartSync,
}

pub fn fixture(policy: WritePolicy) -> Fixture {
  let start = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
  let clock = Arc::new(ManualClock::new(start));
  let store = Arc::new(MemoryStore::new(clock.clone()));
  let repo = CartRepository::new(store.clone(), clock.clone()).with_ttl(TTL);
  Fixture {
    clock,
    store,
    sync: CartSync::new(repo, policy),
  }
}

pub fn caller() -> Caller {
  Caller::new("caller-1")
}

pub fn assert_total_invariant(cart: &cartsync::Cart) {
  let sum: f64 = cart.items.values().map(|i| i.total_price).sum();
  assert!(
    (cart.total - sum).abs() < 1e-9,
    "total {} does not match sum of lines {}",
    cart.total,
    sum
  );
  for item in cart.items.values() {
    assert!((item.total_price - item.price * item.quantity as f64).abs() < 1e-9);
  }
}

// --- Store wrapper that yields between read and write, widening race windows ---
pub struct SlowStore {
  pub inner: Arc<MemoryStore>,
  pub delay: Duration,
  pub writes: AtomicUsize,
}

impl SlowStore {
  pub fn new(inner: Arc<MemoryStore>, delay: Duration) -> Self {
    Self {
      inner,
      delay,
      writes: AtomicUsize::new(0),
    }
  }
}

#[async_trait]
impl CartStore for SlowStore {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let value = self.inner.get(key).await?;
    tokio::time::sleep(self.delay).await;
    Ok(value)
  }

  async fn set_with_expiry(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
    self.writes.fetch_add(1, Ordering::SeqCst);
    self.inner.set_with_expiry(key, value, ttl).await
  }

  async fn ping(&self) -> Result<(), StoreError> {
    self.inner.ping().await
  }
}

// --- Store that fails writes on demand ---
pub struct FlakyStore {
  pub inner: Arc<MemoryStore>,
  pub fail_writes: AtomicBool,
  pub fail_reads: AtomicBool,
}

impl FlakyStore {
  pub fn new(inner: Arc<MemoryStore>) -> Self {
    Self {
      inner,
      fail_writes: AtomicBool::new(false),
      fail_reads: AtomicBool::new(false),
    }
  }
}

#[async_trait]
impl CartStore for FlakyStore {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    if self.fail_reads.load(Ordering::SeqCst) {
      return Err(StoreError::backend("get", anyhow::anyhow!("connection refused")));
    }
    self.inner.get(key).await
  }

  async fn set_with_expiry(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
    if self.fail_writes.load(Ordering::SeqCst) {
      return Err(StoreError::Timeout {
        operation: "set_with_expiry",
        after: Duration::from_millis(10),
      });
    }
    self.inner.set_with_expiry(key, value, ttl).await
  }

  async fn ping(&self) -> Result<(), StoreError> {
    self.inner.ping().await
  }
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
