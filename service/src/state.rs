// service/src/state.rs
use crate::config::{AppConfig, StoreBackend};
use crate::services::{HttpIdentityProvider, IdentityProvider};
use anyhow::Context;
use cartsync::{CartRepository, CartStore, CartSync, Clock, MemoryStore, RedisStore, SystemClock};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
  pub carts: Arc<CartSync>,
  pub identity: Arc<dyn IdentityProvider>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(config: Arc<AppConfig>, store: Arc<dyn CartStore>, identity: Arc<dyn IdentityProvider>) -> Self {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    Self::with_clock(config, store, identity, clock)
  }

  pub fn with_clock(
    config: Arc<AppConfig>,
    store: Arc<dyn CartStore>,
    identity: Arc<dyn IdentityProvider>,
    clock: Arc<dyn Clock>,
  ) -> Self {
    let repo = CartRepository::new(store, clock)
      .with_key_prefix(config.cart_key_prefix.clone())
      .with_ttl(config.cart_ttl);
    Self {
      carts: Arc::new(CartSync::new(repo, config.write_policy)),
      identity,
      config,
    }
  }

  /// Connects the configured store (verifying it answers) and the identity client.
  pub async fn from_config(config: Arc<AppConfig>) -> anyhow::Result<Self> {
    let store: Arc<dyn CartStore> = match config.store_backend {
      StoreBackend::Redis => {
        let store = RedisStore::connect(&config.redis_url, config.store_timeout)
          .await
          .with_context(|| format!("Failed to connect to Redis at {}", config.redis_url))?;
        store.ping().await.context("Redis did not answer PING")?;
        tracing::info!(redis_url = %config.redis_url, "Connected to Redis.");
        Arc::new(store)
      }
      StoreBackend::Memory => {
        tracing::warn!("Using the in-process memory store; carts are lost on restart.");
        Arc::new(MemoryStore::default())
      }
    };

    let identity = HttpIdentityProvider::new(config.auth_service_url.clone(), config.auth_timeout)
      .context("Failed to build identity service client")?;

    Ok(Self::new(config, store, Arc::new(identity)))
  }
}
