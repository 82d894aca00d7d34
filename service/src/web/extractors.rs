// service/src/web/extractors.rs

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use cartsync::Caller;
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::errors::AppError;
use crate::services::IdentityError;
use crate::state::AppState;

/// Caller resolved from the session cookie. Declaring it as a handler argument makes the route
/// authenticated: extraction fails with 401 before the body is read.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Caller);

impl AuthenticatedUser {
  pub fn caller(&self) -> &Caller {
    &self.0
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let state = req.app_data::<web::Data<AppState>>().cloned();
    let cookie_header = req
      .headers()
      .get(header::COOKIE)
      .and_then(|v| v.to_str().ok())
      .map(str::to_owned);
    let has_session = state
      .as_ref()
      .map(|s| req.cookie(&s.config.session_cookie_name).is_some())
      .unwrap_or(false);

    Box::pin(async move {
      let state = state.ok_or_else(|| AppError::Internal("application state not configured".to_string()))?;
      let cookie_header = match cookie_header {
        Some(h) if has_session => h,
        _ => {
          warn!("Request without a session cookie.");
          return Err(IdentityError::MissingSession.into());
        }
      };
      let caller = state.identity.current_user(&cookie_header).await?;
      Ok(AuthenticatedUser(caller))
    })
  }
}
