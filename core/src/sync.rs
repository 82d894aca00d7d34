// cartsync/src/sync.rs

//! `CartSync`: the read-modify-write cycle every cart operation goes through.
//!
//! Each operation runs three phases:
//!  1. `load_cart`: fetch the stored cart, or materialize an empty one where the
//!     operation allows it.
//!  2. `apply_mutation`: run one engine operation on the in-memory copy.
//!  3. `persist_cart`: write the full cart back with a fresh TTL.
//!
//! A failure in any phase ends the operation; nothing is written unless the
//! mutation succeeded, so the stored cart is never left half-updated.
//!
//! With `WritePolicy::SerializePerUser` the three phases for one user never
//! interleave within this process. Several processes sharing one store still
//! race with last-write-wins semantics.

use crate::engine;
use crate::error::{CartError, CartResult};
use crate::locks::{UserGuard, UserLocks};
use crate::model::{Caller, Cart, ItemInput};
use crate::repository::CartRepository;
use chrono::{DateTime, Utc};
use std::str::FromStr;
use tracing::{event, instrument, Level};

/// How overlapping operations on the same user's cart are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WritePolicy {
  /// Operations for one user run one at a time inside this process.
  #[default]
  SerializePerUser,
  /// No coordination: concurrent cycles may overwrite each other's result.
  LastWriteWins,
}

impl FromStr for WritePolicy {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "serialize-per-user" | "serialized" => Ok(WritePolicy::SerializePerUser),
      "last-write-wins" | "lww" => Ok(WritePolicy::LastWriteWins),
      other => Err(format!(
        "unknown write policy '{}', expected 'serialize-per-user' or 'last-write-wins'",
        other
      )),
    }
  }
}

/// What to do when the user has no stored cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnMissing {
  Create,
  Fail,
}

#[derive(Debug)]
pub struct CartSync {
  repo: CartRepository,
  policy: WritePolicy,
  locks: UserLocks,
}

impl CartSync {
  pub fn new(repo: CartRepository, policy: WritePolicy) -> Self {
    Self {
      repo,
      policy,
      locks: UserLocks::new(),
    }
  }

  pub fn repository(&self) -> &CartRepository {
    &self.repo
  }

  pub fn policy(&self) -> WritePolicy {
    self.policy
  }

  /// Returns the user's cart, creating and persisting an empty one if none is stored.
  #[instrument(name = "cart_sync::get_or_create", skip(self, caller), fields(caller_id = %caller.id), err(Display))]
  pub async fn get_or_create(&self, caller: &Caller, user_id: &str) -> CartResult<Cart> {
    let _guard = self.serialize(user_id).await;

    if let Some(cart) = self.repo.load(user_id).await? {
      return Ok(cart);
    }

    let mut cart = Cart::new(user_id, self.now());
    self.repo.save(&mut cart).await?;
    event!(Level::INFO, cart_id = %cart.id, "Created empty cart.");
    Ok(cart)
  }

  #[instrument(
    name = "cart_sync::add_item",
    skip(self, caller, item),
    fields(caller_id = %caller.id, item_id = %item.id, quantity = item.quantity),
    err(Display)
  )]
  pub async fn add_item(&self, caller: &Caller, user_id: &str, item: ItemInput) -> CartResult<Cart> {
    self
      .read_modify_write(user_id, OnMissing::Create, |cart, now| engine::add_item(cart, item, now))
      .await
  }

  #[instrument(
    name = "cart_sync::add_items",
    skip(self, caller, items),
    fields(caller_id = %caller.id, batch = items.len()),
    err(Display)
  )]
  pub async fn add_items(&self, caller: &Caller, user_id: &str, items: Vec<ItemInput>) -> CartResult<Cart> {
    self
      .read_modify_write(user_id, OnMissing::Create, |cart, now| engine::add_items(cart, items, now))
      .await
  }

  #[instrument(name = "cart_sync::update_item_quantity", skip(self, caller), fields(caller_id = %caller.id), err(Display))]
  pub async fn update_item_quantity(
    &self,
    caller: &Caller,
    user_id: &str,
    item_id: &str,
    quantity: i64,
  ) -> CartResult<Cart> {
    self
      .read_modify_write(user_id, OnMissing::Fail, |cart, now| {
        engine::update_item_quantity(cart, item_id, quantity, now)
      })
      .await
  }

  #[instrument(name = "cart_sync::remove_item", skip(self, caller), fields(caller_id = %caller.id), err(Display))]
  pub async fn remove_item(&self, caller: &Caller, user_id: &str, item_id: &str) -> CartResult<Cart> {
    self
      .read_modify_write(user_id, OnMissing::Fail, |cart, now| engine::remove_item(cart, item_id, now))
      .await
  }

  #[instrument(name = "cart_sync::clear", skip(self, caller), fields(caller_id = %caller.id), err(Display))]
  pub async fn clear(&self, caller: &Caller, user_id: &str) -> CartResult<Cart> {
    self
      .read_modify_write(user_id, OnMissing::Fail, |cart, now| {
        engine::clear(cart, now);
        Ok(())
      })
      .await
  }

  async fn read_modify_write<F>(&self, user_id: &str, on_missing: OnMissing, mutation: F) -> CartResult<Cart>
  where
    F: FnOnce(&mut Cart, DateTime<Utc>) -> CartResult<()>,
  {
    let _guard = self.serialize(user_id).await;
    let now = self.now();

    // load_cart
    let mut cart = match (self.repo.load(user_id).await?, on_missing) {
      (Some(cart), _) => cart,
      (None, OnMissing::Create) => {
        event!(Level::DEBUG, "No stored cart, starting from an empty one.");
        Cart::new(user_id, now)
      }
      (None, OnMissing::Fail) => {
        event!(Level::WARN, "Cart not found.");
        return Err(CartError::CartNotFound {
          user_id: user_id.to_string(),
        });
      }
    };

    // apply_mutation
    mutation(&mut cart, now).map_err(|e| {
      event!(Level::WARN, error = %e, "Mutation rejected, store left unchanged.");
      e
    })?;

    // persist_cart
    self.repo.save(&mut cart).await?;
    event!(Level::DEBUG, cart_id = %cart.id, total = cart.total, items = cart.items.len(), "Cart persisted.");
    Ok(cart)
  }

  async fn serialize(&self, user_id: &str) -> Option<UserGuard> {
    match self.policy {
      WritePolicy::SerializePerUser => Some(self.locks.acquire(user_id).await),
      WritePolicy::LastWriteWins => None,
    }
  }

  fn now(&self) -> DateTime<Utc> {
    self.repo.clock().now()
  }
}
