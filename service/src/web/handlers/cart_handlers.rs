// service/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use cartsync::ItemInput;
use serde::{de::DeserializeOwned, Deserialize};
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

// --- Request DTOs ---
#[derive(Deserialize, Debug)]
pub struct UpdateQuantityPayload {
  pub quantity: i64,
}

#[derive(Deserialize, Debug)]
pub struct ItemPath {
  pub user_id: String,
  pub product_id: String,
}

// Bodies arrive as raw bytes and are decoded only after `AuthenticatedUser` has resolved,
// so a rejected session is reported as 401 whatever the body holds.
fn decode_body<T: DeserializeOwned>(body: &web::Bytes) -> Result<T, AppError> {
  serde_json::from_slice(body).map_err(|e| AppError::Validation(format!("Invalid request body: {}", e)))
}

// --- Handler Implementation ---

#[instrument(
  name = "handler::get_cart",
  skip(app_state, auth_user),
  fields(caller_id = %auth_user.caller().id)
)]
pub async fn get_cart_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let cart = app_state.carts.get_or_create(auth_user.caller(), &user_id).await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
  name = "handler::add_item",
  skip(app_state, auth_user, body),
  fields(caller_id = %auth_user.caller().id)
)]
pub async fn add_item_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  user_id: web::Path<String>,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let item: ItemInput = decode_body(&body)?;
  let cart = app_state.carts.add_item(auth_user.caller(), &user_id, item).await?;
  info!(total = cart.total, "Item added to cart.");
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
  name = "handler::bulk_add_items",
  skip(app_state, auth_user, body),
  fields(caller_id = %auth_user.caller().id)
)]
pub async fn bulk_add_items_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  user_id: web::Path<String>,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let items: Vec<ItemInput> = decode_body(&body)?;
  let cart = app_state.carts.add_items(auth_user.caller(), &user_id, items).await?;
  info!(total = cart.total, "Items added to cart.");
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
  name = "handler::update_item",
  skip(app_state, auth_user, path, body),
  fields(caller_id = %auth_user.caller().id, user_id = %path.user_id, item_id = %path.product_id)
)]
pub async fn update_item_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  path: web::Path<ItemPath>,
  body: web::Bytes,
) -> Result<HttpResponse, AppError> {
  let payload: UpdateQuantityPayload = decode_body(&body)?;
  let cart = app_state
    .carts
    .update_item_quantity(auth_user.caller(), &path.user_id, &path.product_id, payload.quantity)
    .await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
  name = "handler::remove_item",
  skip(app_state, auth_user, path),
  fields(caller_id = %auth_user.caller().id, user_id = %path.user_id, item_id = %path.product_id)
)]
pub async fn remove_item_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  path: web::Path<ItemPath>,
) -> Result<HttpResponse, AppError> {
  let cart = app_state
    .carts
    .remove_item(auth_user.caller(), &path.user_id, &path.product_id)
    .await?;
  Ok(HttpResponse::Ok().json(cart))
}

#[instrument(
  name = "handler::clear_cart",
  skip(app_state, auth_user),
  fields(caller_id = %auth_user.caller().id)
)]
pub async fn clear_cart_handler(
  auth_user: AuthenticatedUser,
  app_state: web::Data<AppState>,
  user_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
  let cart = app_state.carts.clear(auth_user.caller(), &user_id).await?;
  info!("Cart cleared.");
  Ok(HttpResponse::Ok().json(cart))
}
