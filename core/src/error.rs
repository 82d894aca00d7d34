// cartsync/src/error.rs
use anyhow::Error as AnyhowError;
use std::time::Duration;
use thiserror::Error;

/// Failure talking to the key-value store.
///
/// A missing key is NOT a `StoreError`; stores report absence as `Ok(None)`.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("Store operation '{operation}' timed out after {after:?}")]
  Timeout { operation: &'static str, after: Duration },

  #[error("Store operation '{operation}' failed. Source: {source}")]
  Backend {
    operation: &'static str,
    #[source]
    source: AnyhowError,
  },
}

impl StoreError {
  pub fn backend(operation: &'static str, source: impl Into<AnyhowError>) -> Self {
    StoreError::Backend {
      operation,
      source: source.into(),
    }
  }
}

#[derive(Debug, Error)]
pub enum CartError {
  #[error("Cart not found for user '{user_id}'")]
  CartNotFound { user_id: String },

  #[error("Item '{item_id}' not found in cart for user '{user_id}'")]
  ItemNotFound { user_id: String, item_id: String },

  #[error("Invalid cart item: {0}")]
  InvalidItem(String),

  #[error("Failed to encode or decode cart record: {0}")]
  Codec(#[from] serde_json::Error),

  #[error(transparent)]
  Store(#[from] StoreError),
}

impl CartError {
  /// True for the "absent cart" and "absent item" conditions.
  pub fn is_not_found(&self) -> bool {
    matches!(self, CartError::CartNotFound { .. } | CartError::ItemNotFound { .. })
  }
}

pub type CartResult<T, E = CartError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn not_found_classification() {
    let cart = CartError::CartNotFound { user_id: "u1".into() };
    let item = CartError::ItemNotFound {
      user_id: "u1".into(),
      item_id: "p1".into(),
    };
    let invalid = CartError::InvalidItem("quantity must be at least 1".into());

    assert!(cart.is_not_found());
    assert!(item.is_not_found());
    assert!(!invalid.is_not_found());
  }

  #[test]
  fn store_error_message_names_operation() {
    let err = CartError::from(StoreError::Timeout {
      operation: "get",
      after: Duration::from_millis(250),
    });
    assert_eq!(err.to_string(), "Store operation 'get' timed out after 250ms");

    let err = StoreError::backend("set_with_expiry", anyhow::anyhow!("connection reset"));
    assert!(err.to_string().contains("set_with_expiry"));
    assert!(err.to_string().contains("connection reset"));
  }
}
