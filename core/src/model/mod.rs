// cartsync/src/model/mod.rs

//! Value types stored in and returned from the cart store.

pub mod caller;
pub mod cart;
pub mod item;

pub use caller::Caller;
pub use cart::{Cart, Items};
pub use item::{CartItem, ItemInput};
