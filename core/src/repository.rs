// cartsync/src/repository.rs

//! Loads and saves whole carts against a `CartStore`, one JSON record per user key.

use crate::clock::Clock;
use crate::error::CartResult;
use crate::model::Cart;
use crate::store::CartStore;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tracing::{event, instrument, Level};

/// Prefix every cart key starts with; the user id follows directly.
pub const DEFAULT_KEY_PREFIX: &str = "cart:";

/// Carts live for two days after their last write.
pub const DEFAULT_CART_TTL: Duration = Duration::from_secs(48 * 60 * 60);

#[derive(Clone)]
pub struct CartRepository {
  store: Arc<dyn CartStore>,
  clock: Arc<dyn Clock>,
  key_prefix: String,
  ttl: Duration,
}

impl CartRepository {
  pub fn new(store: Arc<dyn CartStore>, clock: Arc<dyn Clock>) -> Self {
    Self {
      store,
      clock,
      key_prefix: DEFAULT_KEY_PREFIX.to_string(),
      ttl: DEFAULT_CART_TTL,
    }
  }

  pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
    self.key_prefix = prefix.into();
    self
  }

  pub fn with_ttl(mut self, ttl: Duration) -> Self {
    self.ttl = ttl;
    self
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  pub fn clock(&self) -> &Arc<dyn Clock> {
    &self.clock
  }

  pub fn store(&self) -> &Arc<dyn CartStore> {
    &self.store
  }

  pub fn key_for(&self, user_id: &str) -> String {
    format!("{}{}", self.key_prefix, user_id)
  }

  /// `Ok(None)` when the user has no stored cart (never created, or expired).
  #[instrument(name = "cart_repository::load", skip(self), err(Display))]
  pub async fn load(&self, user_id: &str) -> CartResult<Option<Cart>> {
    let key = self.key_for(user_id);
    let Some(raw) = self.store.get(&key).await? else {
      event!(Level::DEBUG, %key, "No stored cart.");
      return Ok(None);
    };

    let cart: Cart = serde_json::from_str(&raw).map_err(|e| {
      event!(Level::ERROR, %key, error = %e, "Stored cart record could not be decoded.");
      e
    })?;
    Ok(Some(cart))
  }

  /// Writes the whole cart, replacing any previous record, and restarts its TTL window.
  ///
  /// Stamps `cart.expires_at` before serializing so the stored record carries its own expiry.
  #[instrument(
    name = "cart_repository::save",
    skip(self, cart),
    fields(user_id = %cart.user_id, cart_id = %cart.id, items = cart.items.len()),
    err(Display)
  )]
  pub async fn save(&self, cart: &mut Cart) -> CartResult<()> {
    cart.expires_at = self.next_expiry(cart.expires_at)?;
    let payload = serde_json::to_string(&*cart)?;
    let key = self.key_for(&cart.user_id);
    self.store.set_with_expiry(&key, payload, self.ttl).await?;
    event!(Level::DEBUG, %key, expires_at = %cart.expires_at, "Cart saved.");
    Ok(())
  }

  fn next_expiry(&self, previous: DateTime<Utc>) -> CartResult<DateTime<Utc>> {
    let ttl = chrono::Duration::from_std(self.ttl)
      .map_err(|e| crate::error::StoreError::backend("save", e))?;
    Ok(std::cmp::max(previous, self.clock.now() + ttl))
  }
}

impl std::fmt::Debug for CartRepository {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("CartRepository")
      .field("key_prefix", &self.key_prefix)
      .field("ttl", &self.ttl)
      .finish_non_exhaustive()
  }
}
