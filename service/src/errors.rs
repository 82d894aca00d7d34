// service/src/errors.rs

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use cartsync::{CartError, StoreError};
use serde_json::json;
use thiserror::Error;

use crate::services::identity_service::IdentityError;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Resource Not Found: {0}")]
  NotFound(String),

  #[error("Cart Store Error: {0}")]
  Store(String),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Internal Server Error: {0}")]
  Internal(String),
}

impl From<CartError> for AppError {
  fn from(err: CartError) -> Self {
    match err {
      CartError::InvalidItem(m) => AppError::Validation(m),
      e @ (CartError::CartNotFound { .. } | CartError::ItemNotFound { .. }) => AppError::NotFound(e.to_string()),
      e @ (CartError::Codec(_) | CartError::Store(_)) => AppError::Store(e.to_string()),
    }
  }
}

impl From<StoreError> for AppError {
  fn from(err: StoreError) -> Self {
    AppError::Store(err.to_string())
  }
}

impl From<IdentityError> for AppError {
  fn from(err: IdentityError) -> Self {
    AppError::Auth(err.to_string())
  }
}

// Startup paths in main use anyhow; anything left over is internal.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    AppError::Internal(err.to_string())
  }
}

impl AppError {
  /// Message placed in the `{"error": ...}` body. Internal detail stays in the logs.
  fn public_message(&self) -> String {
    match self {
      AppError::Validation(m) | AppError::NotFound(m) => m.clone(),
      AppError::Auth(_) => "Not authorized".to_string(),
      AppError::Store(_) => "Cart storage is unavailable".to_string(),
      AppError::Config(_) => "Configuration issue".to_string(),
      AppError::Internal(_) => "An internal error occurred".to_string(),
    }
  }
}

impl ResponseError for AppError {
  fn status_code(&self) -> StatusCode {
    match self {
      AppError::Validation(_) => StatusCode::BAD_REQUEST,
      AppError::Auth(_) => StatusCode::UNAUTHORIZED,
      AppError::NotFound(_) => StatusCode::NOT_FOUND,
      AppError::Store(_) | AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    if status.is_server_error() {
      tracing::error!(application_error = %self, "Responding with error");
    } else {
      tracing::warn!(application_error = %self, status = status.as_u16(), "Responding with error");
    }
    HttpResponse::build(status).json(json!({ "error": self.public_message() }))
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
