// service/src/web/routes.rs

use actix_web::web;

use crate::web::handlers::{cart_handlers, health_handlers};

// This function will be called in `main.rs` to configure services for the Actix App.
pub fn configure_app_routes(cfg: &mut web::ServiceConfig) {
  cfg.service(
    web::scope("/api/cart")
      // Registered first so it wins over `/{user_id}`.
      .route("/health", web::get().to(health_handlers::health_check_handler))
      .route("/{user_id}", web::get().to(cart_handlers::get_cart_handler))
      .route("/{user_id}/items", web::post().to(cart_handlers::add_item_handler))
      .route(
        "/{user_id}/items/bulk-add",
        web::post().to(cart_handlers::bulk_add_items_handler),
      )
      .route(
        "/{user_id}/items/{product_id}",
        web::put().to(cart_handlers::update_item_handler),
      )
      .route(
        "/{user_id}/items/{product_id}",
        web::delete().to(cart_handlers::remove_item_handler),
      )
      .route("/{user_id}/clear", web::delete().to(cart_handlers::clear_cart_handler)),
  );
}
