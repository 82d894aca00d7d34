// cartsync/src/model/item.rs

use crate::error::{CartError, CartResult};
use serde::{Deserialize, Serialize};

/// One line of a cart, as persisted and as returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
  pub id: String,
  pub quantity: i64,
  pub price: f64,
  /// Always `price * quantity`; recomputed by the engine, never trusted from input.
  #[serde(default)]
  pub total_price: f64,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub image: String,
}

impl CartItem {
  pub fn from_input(input: ItemInput) -> Self {
    let mut item = CartItem {
      id: input.id,
      quantity: input.quantity,
      price: input.price,
      total_price: 0.0,
      title: input.title,
      description: input.description,
      category: input.category,
      image: input.image,
    };
    item.recompute_line_total();
    item
  }

  pub fn recompute_line_total(&mut self) {
    self.total_price = self.price * self.quantity as f64;
  }
}

/// Inbound payload for add and bulk-add. A `total_price` sent by a client is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInput {
  pub id: String,
  pub quantity: i64,
  pub price: f64,
  #[serde(default)]
  pub title: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub image: String,
}

impl ItemInput {
  /// Minimal constructor; display metadata left empty.
  pub fn new(id: impl Into<String>, quantity: i64, price: f64) -> Self {
    Self {
      id: id.into(),
      quantity,
      price,
      title: String::new(),
      description: String::new(),
      category: String::new(),
      image: String::new(),
    }
  }

  pub fn with_title(mut self, title: impl Into<String>) -> Self {
    self.title = title.into();
    self
  }

  pub fn validate(&self) -> CartResult<()> {
    if self.id.trim().is_empty() {
      return Err(CartError::InvalidItem("item id must not be empty".to_string()));
    }
    if self.quantity < 1 {
      return Err(CartError::InvalidItem(format!(
        "quantity for item '{}' must be at least 1, got {}",
        self.id, self.quantity
      )));
    }
    if !self.price.is_finite() || self.price < 0.0 {
      return Err(CartError::InvalidItem(format!(
        "price for item '{}' must be a non-negative number, got {}",
        self.id, self.price
      )));
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn from_input_computes_line_total() {
    let item = CartItem::from_input(ItemInput::new("sku-1", 3, 2.5));
    assert_eq!(item.total_price, 7.5);
  }

  #[test]
  fn client_supplied_total_is_ignored() {
    let input: ItemInput =
      serde_json::from_str(r#"{"id":"sku-1","quantity":2,"price":4.0,"total_price":999.0}"#).unwrap();
    let item = CartItem::from_input(input);
    assert_eq!(item.total_price, 8.0);
  }

  #[test]
  fn metadata_defaults_to_empty() {
    let input: ItemInput = serde_json::from_str(r#"{"id":"sku-1","quantity":1,"price":1.0}"#).unwrap();
    assert_eq!(input.title, "");
    assert_eq!(input.image, "");
  }

  #[test]
  fn missing_quantity_is_a_decode_error() {
    let result = serde_json::from_str::<ItemInput>(r#"{"id":"sku-1","price":1.0}"#);
    assert!(result.is_err());
  }

  #[test]
  fn validation_rejects_bad_items() {
    assert!(ItemInput::new("", 1, 1.0).validate().is_err());
    assert!(ItemInput::new("   ", 1, 1.0).validate().is_err());
    assert!(ItemInput::new("a", 0, 1.0).validate().is_err());
    assert!(ItemInput::new("a", -2, 1.0).validate().is_err());
    assert!(ItemInput::new("a", 1, -0.01).validate().is_err());
    assert!(ItemInput::new("a", 1, f64::NAN).validate().is_err());
    assert!(ItemInput::new("a", 1, 0.0).validate().is_ok());
  }
}
