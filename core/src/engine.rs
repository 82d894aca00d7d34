// cartsync/src/engine.rs

//! In-memory cart mutations. No I/O happens here.
//!
//! Every operation takes the cart to mutate and the current time, leaves the
//! cart's `total` equal to the sum of its line totals, and stamps `updated_at`.
//! `expires_at` is owned by the repository and is never touched here.
//! On error the cart is left exactly as it was passed in.
//!
//! Line totals and the cart total must stay finite: a non-finite amount cannot
//! be written to the JSON record and read back.

use crate::error::{CartError, CartResult};
use crate::model::{Cart, CartItem, ItemInput, Items};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Adds one item. An existing line with the same id has the incoming quantity
/// added to it; price and display metadata are taken from the incoming item.
pub fn add_item(cart: &mut Cart, input: ItemInput, now: DateTime<Utc>) -> CartResult<()> {
  add_items(cart, vec![input], now)
}

/// Adds items in order. Repeated ids inside one batch accumulate against the
/// running cart state. All items are validated before any is applied.
pub fn add_items(cart: &mut Cart, inputs: Vec<ItemInput>, now: DateTime<Utc>) -> CartResult<()> {
  for input in &inputs {
    input.validate()?;
  }

  // Merge into a scratch copy so a failure halfway through leaves `cart` untouched.
  let mut items = cart.items.clone();
  for input in inputs {
    merge_into(&mut items, input)?;
  }
  commit(cart, items, now)
}

/// Replaces an existing line's quantity. A quantity of zero or less removes the line.
pub fn update_item_quantity(
  cart: &mut Cart,
  item_id: &str,
  quantity: i64,
  now: DateTime<Utc>,
) -> CartResult<()> {
  if !cart.items.contains_key(item_id) {
    return Err(item_not_found(cart, item_id));
  }

  let mut items = cart.items.clone();
  if quantity <= 0 {
    debug!(user_id = %cart.user_id, item_id, quantity, "Non-positive quantity, removing line.");
    items.remove(item_id);
  } else if let Some(item) = items.get_mut(item_id) {
    item.quantity = quantity;
    item.recompute_line_total();
    ensure_finite_line(item)?;
  }
  commit(cart, items, now)
}

pub fn remove_item(cart: &mut Cart, item_id: &str, now: DateTime<Utc>) -> CartResult<()> {
  if cart.items.remove(item_id).is_none() {
    return Err(item_not_found(cart, item_id));
  }
  recalculate_total(cart);
  cart.updated_at = now;
  Ok(())
}

/// Empties the cart. Identity, owner and creation time are kept.
pub fn clear(cart: &mut Cart, now: DateTime<Utc>) {
  cart.items.clear();
  recalculate_total(cart);
  cart.updated_at = now;
}

/// Sets `total` to the sum of all line totals, folded in item id order. Idempotent.
pub fn recalculate_total(cart: &mut Cart) {
  cart.total = sum_lines(&cart.items);
}

fn sum_lines(items: &Items) -> f64 {
  items.values().map(|item| item.total_price).sum()
}

/// Swaps in the new line set only if its total is representable.
fn commit(cart: &mut Cart, items: Items, now: DateTime<Utc>) -> CartResult<()> {
  let total = sum_lines(&items);
  if !total.is_finite() {
    return Err(CartError::InvalidItem(format!(
      "cart total for user '{}' would exceed the representable range",
      cart.user_id
    )));
  }
  cart.items = items;
  cart.total = total;
  cart.updated_at = now;
  Ok(())
}

fn merge_into(items: &mut Items, input: ItemInput) -> CartResult<()> {
  let mut incoming = CartItem::from_input(input);

  if let Some(existing) = items.get(&incoming.id) {
    incoming.quantity = existing.quantity.checked_add(incoming.quantity).ok_or_else(|| {
      CartError::InvalidItem(format!("quantity for item '{}' is too large", incoming.id))
    })?;
    incoming.recompute_line_total();
  }
  ensure_finite_line(&incoming)?;

  items.insert(incoming.id.clone(), incoming);
  Ok(())
}

fn ensure_finite_line(item: &CartItem) -> CartResult<()> {
  if item.total_price.is_finite() {
    Ok(())
  } else {
    Err(CartError::InvalidItem(format!(
      "line total for item '{}' ({} x {}) is too large",
      item.id, item.quantity, item.price
    )))
  }
}

fn item_not_found(cart: &Cart, item_id: &str) -> CartError {
  CartError::ItemNotFound {
    user_id: cart.user_id.clone(),
    item_id: item_id.to_string(),
  }
}
