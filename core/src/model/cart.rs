// cartsync/src/model/cart.rs

use crate::model::item::CartItem;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Lines keyed by `CartItem::id`. Ordered so totals fold the same way on every copy.
pub type Items = BTreeMap<String, CartItem>;

/// A user's cart. Serialized as-is into the store, one record per user key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
  /// Assigned once when the cart is materialized; a cart re-created after TTL expiry gets a new one.
  pub id: String,
  pub user_id: String,
  pub items: Items,
  pub total: f64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

impl Cart {
  /// An empty cart. `expires_at` starts at `now` and is stamped by the repository on save.
  pub fn new(user_id: impl Into<String>, now: DateTime<Utc>) -> Self {
    Self {
      id: Uuid::new_v4().to_string(),
      user_id: user_id.into(),
      items: Items::new(),
      total: 0.0,
      created_at: now,
      updated_at: now,
      expires_at: now,
    }
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn item(&self, item_id: &str) -> Option<&CartItem> {
    self.items.get(item_id)
  }
}
