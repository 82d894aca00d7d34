// service/src/web/middleware.rs

use actix_web::{
  body::{EitherBody, MessageBody},
  dev::{ServiceRequest, ServiceResponse},
  middleware::Next,
  Error, ResponseError,
};
use futures_util::FutureExt;
use std::panic::AssertUnwindSafe;

use crate::errors::AppError;

/// Turns a panic inside request handling into a 500 response so the worker keeps serving.
pub async fn catch_panics(
  req: ServiceRequest,
  next: Next<impl MessageBody>,
) -> Result<ServiceResponse<EitherBody<impl MessageBody>>, Error> {
  let http_req = req.request().clone();
  let method = req.method().clone();
  let path = req.path().to_owned();

  match AssertUnwindSafe(next.call(req)).catch_unwind().await {
    Ok(result) => result.map(ServiceResponse::map_into_left_body),
    Err(panic) => {
      let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());
      tracing::error!(%method, %path, panic = %detail, "Request handler panicked.");
      let response = AppError::Internal(format!("handler panicked: {}", detail)).error_response();
      Ok(ServiceResponse::new(http_req, response).map_into_right_body())
    }
  }
}
