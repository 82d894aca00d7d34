// cartsync/src/model/caller.rs

use serde::{Deserialize, Serialize};

/// The authenticated identity behind a request, as reported by the identity service.
///
/// Threaded explicitly into every `CartSync` call so logs record who acted on a cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caller {
  pub id: String,
  #[serde(default)]
  pub email: Option<String>,
  #[serde(default)]
  pub username: Option<String>,
}

impl Caller {
  pub fn new(id: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      email: None,
      username: None,
    }
  }
}
