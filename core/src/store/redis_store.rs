// cartsync/src/store/redis_store.rs

use crate::error::StoreError;
use crate::store::CartStore;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use std::future::Future;
use std::time::Duration;
use tracing::{event, instrument, Level};

/// Redis-backed store. Values are written with `SET key value EX ttl`, so
/// expiry is enforced by Redis itself.
///
/// `ConnectionManager` multiplexes one connection and reconnects on failure;
/// cloning it is cheap and every call works on its own clone.
#[derive(Clone)]
pub struct RedisStore {
  conn: ConnectionManager,
  op_timeout: Duration,
}

impl RedisStore {
  #[instrument(name = "redis_store::connect", skip(url), err(Display))]
  pub async fn connect(url: &str, op_timeout: Duration) -> Result<Self, StoreError> {
    let client = redis::Client::open(url).map_err(|e| StoreError::backend("connect", e))?;
    let conn = bounded("connect", op_timeout, async {
      client
        .get_connection_manager()
        .await
        .map_err(|e| StoreError::backend("connect", e))
    })
    .await?;
    event!(Level::INFO, "Connected to Redis.");
    Ok(Self { conn, op_timeout })
  }

  pub fn from_connection(conn: ConnectionManager, op_timeout: Duration) -> Self {
    Self { conn, op_timeout }
  }
}

impl std::fmt::Debug for RedisStore {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RedisStore")
      .field("op_timeout", &self.op_timeout)
      .finish_non_exhaustive()
  }
}

#[async_trait]
impl CartStore for RedisStore {
  async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
    let mut conn = self.conn.clone();
    bounded("get", self.op_timeout, async move {
      conn
        .get::<_, Option<String>>(key)
        .await
        .map_err(|e| StoreError::backend("get", e))
    })
    .await
  }

  async fn set_with_expiry(&self, key: &str, value: String, ttl: Duration) -> Result<(), StoreError> {
    // EX takes whole seconds; never round a non-zero TTL down to an invalid 0.
    let seconds = ttl.as_secs().max(1);
    let mut conn = self.conn.clone();
    bounded("set_with_expiry", self.op_timeout, async move {
      conn
        .set_ex::<_, _, ()>(key, value, seconds)
        .await
        .map_err(|e| StoreError::backend("set_with_expiry", e))
    })
    .await
  }

  async fn ping(&self) -> Result<(), StoreError> {
    let mut conn = self.conn.clone();
    bounded("ping", self.op_timeout, async move {
      let _pong: String = redis::cmd("PING")
        .query_async(&mut conn)
        .await
        .map_err(|e| StoreError::backend("ping", e))?;
      Ok(())
    })
    .await
  }
}

async fn bounded<T, F>(operation: &'static str, after: Duration, fut: F) -> Result<T, StoreError>
where
  F: Future<Output = Result<T, StoreError>>,
{
  match tokio::time::timeout(after, fut).await {
    Ok(result) => result,
    Err(_) => {
      event!(Level::WARN, operation, ?after, "Redis call timed out.");
      Err(StoreError::Timeout { operation, after })
    }
  }
}
