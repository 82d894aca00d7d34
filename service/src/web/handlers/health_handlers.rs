// service/src/web/handlers/health_handlers.rs

use actix_web::HttpResponse;

/// Liveness only: answers without touching the cart store or the identity service.
pub async fn health_check_handler() -> HttpResponse {
  HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
