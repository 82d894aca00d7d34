// service/src/lib.rs

//! HTTP front for the cart synchronizer: authenticates callers against the identity service and
//! maps `/api/cart` routes onto `cartsync::CartSync` operations.

pub mod config;
pub mod errors;
pub mod services;
pub mod state;
pub mod web;

pub use config::{AppConfig, LogFormat, StoreBackend};
pub use errors::{AppError, Result};
pub use state::AppState;
