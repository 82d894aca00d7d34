// cartsync/src/lib.rs

//! cartsync: per-user shopping cart state kept in an expiring key-value store.
//!
//! The crate is built around one protocol, read-modify-write against a shared
//! TTL-backed store:
//!  - Carts are loaded from a `CartStore` (or materialized empty on first use).
//!  - A single mutation is applied in memory by the `engine` module, which owns
//!    quantity merging and total recalculation.
//!  - The whole cart is written back with its expiry pushed to `now + TTL`.
//!
//! The store has no transactions, so two overlapping cycles for the same user
//! can lose one update. `CartSync` closes that window inside one process by
//! serializing operations per user (`WritePolicy::SerializePerUser`), or keeps
//! last-write-wins semantics when configured to.

pub mod clock;
pub mod engine;
pub mod error;
pub mod locks;
pub mod model;
pub mod repository;
pub mod store;
pub mod sync;

// --- Re-exports for the Public API ---

pub use crate::clock::{Clock, ManualClock, SystemClock};
pub use crate::error::{CartError, CartResult, StoreError};
pub use crate::locks::UserLocks;
pub use crate::model::{Caller, Cart, CartItem, ItemInput, Items};
pub use crate::repository::{CartRepository, DEFAULT_CART_TTL, DEFAULT_KEY_PREFIX};
pub use crate::store::{CartStore, MemoryStore};
#[cfg(feature = "redis-store")]
pub use crate::store::RedisStore;
pub use crate::sync::{CartSync, WritePolicy};

/*
    Typical wiring:
    1. Build a store: `MemoryStore::new(clock)` or `RedisStore::connect(url, timeout).await?`.
    2. Wrap it in a `CartRepository` with the key prefix and TTL.
    3. Build a `CartSync` over the repository with a `WritePolicy`.
    4. Call `get_or_create`, `add_item`, `update_item_quantity`, ... per request,
       passing the authenticated `Caller` for logging.
*/
