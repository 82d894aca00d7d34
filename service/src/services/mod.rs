// service/src/services/mod.rs

pub mod identity_service;

pub use identity_service::{HttpIdentityProvider, IdentityError, IdentityProvider};
