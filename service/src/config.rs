// service/src/config.rs

use crate::errors::{AppError, Result}; // Use AppError specific Result
use cartsync::WritePolicy;
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
  Redis,
  Memory,
}

impl FromStr for StoreBackend {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "redis" => Ok(StoreBackend::Redis),
      "memory" => Ok(StoreBackend::Memory),
      other => Err(format!("unknown store backend '{}', expected 'redis' or 'memory'", other)),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
  Pretty,
  Json,
}

impl FromStr for LogFormat {
  type Err = String;

  fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
    match s.trim().to_ascii_lowercase().as_str() {
      "pretty" | "text" => Ok(LogFormat::Pretty),
      "json" => Ok(LogFormat::Json),
      other => Err(format!("unknown log format '{}', expected 'pretty' or 'json'", other)),
    }
  }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,

  pub store_backend: StoreBackend,
  pub redis_url: String,
  pub store_timeout: Duration,

  pub cart_key_prefix: String,
  pub cart_ttl: Duration,
  pub write_policy: WritePolicy,

  pub auth_service_url: String,
  pub auth_timeout: Duration,
  pub session_cookie_name: String,

  pub log_format: LogFormat,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      server_host: "0.0.0.0".to_string(),
      server_port: 8080,
      store_backend: StoreBackend::Redis,
      redis_url: "redis://cart-redis-srv:6379/0".to_string(),
      store_timeout: Duration::from_millis(2000),
      cart_key_prefix: cartsync::DEFAULT_KEY_PREFIX.to_string(),
      cart_ttl: cartsync::DEFAULT_CART_TTL,
      write_policy: WritePolicy::default(),
      auth_service_url: "http://auth-srv:3000/api/users/currentuser".to_string(),
      auth_timeout: Duration::from_secs(5),
      session_cookie_name: "session".to_string(),
      log_format: LogFormat::Pretty,
    }
  }
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present
    Self::from_lookup(|name| env::var(name).ok())
  }

  /// Builds the config from any variable source; unset variables take their defaults.
  pub fn from_lookup<F>(lookup: F) -> Result<Self>
  where
    F: Fn(&str) -> Option<String>,
  {
    let defaults = Self::default();

    let parsed = |name: &str| -> Option<String> { lookup(name).filter(|v| !v.trim().is_empty()) };

    fn parse_as<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
    where
      T: FromStr,
      T::Err: std::fmt::Display,
    {
      match raw {
        None => Ok(default),
        Some(v) => v
          .trim()
          .parse::<T>()
          .map_err(|e| AppError::Config(format!("Invalid {} '{}': {}", name, v, e))),
      }
    }

    let server_host = parsed("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = parse_as("SERVER_PORT", parsed("SERVER_PORT"), defaults.server_port)?;

    let store_backend = parse_as("STORE_BACKEND", parsed("STORE_BACKEND"), defaults.store_backend)?;
    let redis_url = parsed("REDIS_URL").unwrap_or(defaults.redis_url);
    let store_timeout_ms: u64 = parse_as("STORE_TIMEOUT_MS", parsed("STORE_TIMEOUT_MS"), 2000)?;
    if store_timeout_ms == 0 {
      return Err(AppError::Config("STORE_TIMEOUT_MS must be greater than zero".to_string()));
    }

    let cart_key_prefix = lookup("CART_KEY_PREFIX").unwrap_or(defaults.cart_key_prefix);
    let cart_ttl_hours: u64 = parse_as("CART_TTL_HOURS", parsed("CART_TTL_HOURS"), 48)?;
    if cart_ttl_hours == 0 {
      return Err(AppError::Config("CART_TTL_HOURS must be greater than zero".to_string()));
    }
    let write_policy = parse_as("CART_WRITE_POLICY", parsed("CART_WRITE_POLICY"), defaults.write_policy)?;

    let auth_service_url = parsed("AUTH_SERVICE_URL").unwrap_or(defaults.auth_service_url);
    let auth_timeout_secs: u64 = parse_as("AUTH_TIMEOUT_SECS", parsed("AUTH_TIMEOUT_SECS"), 5)?;
    if auth_timeout_secs == 0 {
      return Err(AppError::Config("AUTH_TIMEOUT_SECS must be greater than zero".to_string()));
    }
    let session_cookie_name = parsed("SESSION_COOKIE_NAME").unwrap_or(defaults.session_cookie_name);

    let log_format = parse_as("LOG_FORMAT", parsed("LOG_FORMAT"), defaults.log_format)?;

    Ok(Self {
      server_host,
      server_port,
      store_backend,
      redis_url,
      store_timeout: Duration::from_millis(store_timeout_ms),
      cart_key_prefix,
      cart_ttl: Duration::from_secs(cart_ttl_hours * 60 * 60),
      write_policy,
      auth_service_url,
      auth_timeout: Duration::from_secs(auth_timeout_secs),
      session_cookie_name,
      log_format,
    })
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }
}
