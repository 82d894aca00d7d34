// service/src/services/identity_service.rs

//! Resolves the caller behind a request by asking the identity service who owns the session.

use async_trait::async_trait;
use cartsync::Caller;
use reqwest::{header::COOKIE, Client};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, instrument, warn};

#[derive(Debug, Error)]
pub enum IdentityError {
  #[error("no session cookie on request")]
  MissingSession,

  #[error("identity service unreachable: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("identity service answered with status {0}")]
  Rejected(u16),

  #[error("identity service returned an unreadable body: {0}")]
  Malformed(String),

  #[error("session does not belong to a signed-in user")]
  Anonymous,
}

/// Source of caller identity. Every rejection is an authentication failure for the request.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
  /// `cookie_header` is the raw `Cookie` header of the incoming request, forwarded as-is.
  async fn current_user(&self, cookie_header: &str) -> Result<Caller, IdentityError>;
}

/// Calls the auth service's current-user endpoint over HTTP.
#[derive(Debug, Clone)]
pub struct HttpIdentityProvider {
  http: Client,
  endpoint: String,
}

impl HttpIdentityProvider {
  pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, IdentityError> {
    let http = Client::builder().timeout(timeout).build()?;
    Ok(Self {
      http,
      endpoint: endpoint.into(),
    })
  }

  pub fn endpoint(&self) -> &str {
    &self.endpoint
  }
}

#[async_trait]
impl IdentityProvider for HttpIdentityProvider {
  #[instrument(name = "identity_service::current_user", skip(self, cookie_header), fields(endpoint = %self.endpoint))]
  async fn current_user(&self, cookie_header: &str) -> Result<Caller, IdentityError> {
    let response = self
      .http
      .get(&self.endpoint)
      .header(COOKIE, cookie_header)
      .send()
      .await
      .map_err(|e| {
        warn!(error = %e, "Identity request failed.");
        IdentityError::Transport(e)
      })?;

    let status = response.status();
    if !status.is_success() {
      warn!(status = status.as_u16(), "Identity service rejected the session.");
      return Err(IdentityError::Rejected(status.as_u16()));
    }

    let body = response.text().await?;
    let caller = parse_current_user(&body)?;
    debug!(caller_id = %caller.id, "Caller resolved.");
    Ok(caller)
  }
}

/// The endpoint answers `null` for anonymous sessions, otherwise an object with at least `id`.
pub fn parse_current_user(body: &str) -> Result<Caller, IdentityError> {
  let parsed: Option<Caller> = serde_json::from_str(body).map_err(|e| IdentityError::Malformed(e.to_string()))?;
  match parsed {
    Some(caller) if !caller.id.trim().is_empty() => Ok(caller),
    _ => Err(IdentityError::Anonymous),
  }
}
