// apps/storefront/src/web/handlers/account_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

pub const ORDER_NOT_FOUND_MESSAGE: &str = "Pedido no encontrado";

#[instrument(name = "handler::my_orders", skip(app_state, auth_user), fields(user_id = %auth_user.user_id()))]
pub async fn my_orders_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  let orders = app_state.orders.list_for_user(auth_user.user_id()).await?;
  Ok(HttpResponse::Ok().json(json!({
      "message": "Pedidos obtenidos.",
      "orders": orders
  })))
}

/// Someone else's order answers exactly like a missing one.
#[instrument(name = "handler::my_order", skip(app_state, auth_user, path), fields(user_id = %auth_user.user_id(), order_id = %path.as_ref()))]
pub async fn my_order_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  match app_state.orders.find_with_items(order_id).await? {
    Some(order) if order.order.user_id == auth_user.user_id() => Ok(HttpResponse::Ok().json(json!({
        "message": "Pedido obtenido.",
        "order": order
    }))),
    Some(_) => {
      warn!("User asked for an order that belongs to someone else.");
      Err(AppError::NotFound(ORDER_NOT_FOUND_MESSAGE.to_string()))
    }
    None => Err(AppError::NotFound(ORDER_NOT_FOUND_MESSAGE.to_string())),
  }
}
