// apps/storefront/src/web/handlers/admin_handlers.rs

//! Manager-only administration. Every mutation answers with the freshly
//! re-fetched list it touched.

use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use motogear_core::admin::{self, RoleCounts};
use motogear_core::{OrderStatus, ProductInput, ProductUpdate, Role, StoreStats};

use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::ManagerUser;
use crate::web::handlers::account_handlers::ORDER_NOT_FOUND_MESSAGE;
use crate::web::handlers::product_handlers::PRODUCT_NOT_FOUND_MESSAGE;

pub const USER_NOT_FOUND_MESSAGE: &str = "Usuario no encontrado";

#[derive(Deserialize, Debug, Default)]
pub struct AdminListQuery {
  pub q: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct StatusPayload {
  pub status: String,
}

#[derive(Deserialize, Debug)]
pub struct RolePayload {
  pub role: String,
}

// --- Products ---

async fn products_response(app_state: &AppState, q: Option<&str>, message: &str) -> Result<HttpResponse, AppError> {
  let products = admin::filter_products(app_state.products.list_all().await?, q);
  Ok(HttpResponse::Ok().json(json!({
      "message": message,
      "count": products.len(),
      "products": products
  })))
}

#[instrument(name = "handler::admin_list_products", skip(app_state, manager, query), fields(manager_id = %manager.0.user_id()))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  manager: ManagerUser,
  query: web::Query<AdminListQuery>,
) -> Result<HttpResponse, AppError> {
  products_response(&app_state, query.q.as_deref(), "Productos obtenidos.").await
}

#[instrument(name = "handler::admin_create_product", skip(app_state, manager, req_payload), fields(manager_id = %manager.0.user_id(), name = %req_payload.name))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  manager: ManagerUser,
  req_payload: web::Json<ProductInput>,
) -> Result<HttpResponse, AppError> {
  let input = req_payload.into_inner();
  input.validate()?;

  let product = input.into_product(Uuid::new_v4(), Utc::now());
  app_state.products.insert(&product).await?;
  info!("Product {} created.", product.id);

  products_response(&app_state, None, "Producto creado.").await
}

/// Fields missing from the body keep their stored values.
#[instrument(name = "handler::admin_update_product", skip(app_state, manager, path, req_payload), fields(manager_id = %manager.0.user_id(), product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  manager: ManagerUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<ProductUpdate>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let existing = app_state
    .products
    .find(product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND_MESSAGE.to_string()))?;
  let updated = req_payload.into_inner().apply_to(&existing, Utc::now())?;
  if !app_state.products.update(&updated).await? {
    return Err(AppError::NotFound(PRODUCT_NOT_FOUND_MESSAGE.to_string()));
  }
  info!("Product {} updated.", product_id);

  products_response(&app_state, None, "Producto actualizado.").await
}

#[instrument(name = "handler::admin_toggle_product", skip(app_state, manager, path), fields(manager_id = %manager.0.user_id(), product_id = %path.as_ref()))]
pub async fn toggle_product_active_handler(
  app_state: web::Data<AppState>,
  manager: ManagerUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  let existing = app_state
    .products
    .find(product_id)
    .await?
    .ok_or_else(|| AppError::NotFound(PRODUCT_NOT_FOUND_MESSAGE.to_string()))?;

  let is_active = !existing.is_active;
  if !app_state.products.set_active(product_id, is_active, Utc::now()).await? {
    return Err(AppError::NotFound(PRODUCT_NOT_FOUND_MESSAGE.to_string()));
  }
  info!("Product {} is_active set to {}.", product_id, is_active);

  products_response(&app_state, None, "Estado del producto actualizado.").await
}

#[instrument(name = "handler::admin_delete_product", skip(app_state, manager, path), fields(manager_id = %manager.0.user_id(), product_id = %path.as_ref()))]
pub async fn delete_product_handler(
  app_state: web::Data<AppState>,
  manager: ManagerUser,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  if !app_state.products.delete(product_id).await? {
    warn!("Delete requested for unknown product {}.", product_id);
    return Err(AppError::NotFound(PRODUCT_NOT_FOUND_MESSAGE.to_string()));
  }
  info!("Product {} deleted.", product_id);

  products_response(&app_state, None, "Producto eliminado.").await
}

// --- Orders ---

async fn orders_response(app_state: &AppState, q: Option<&str>, message: &str) -> Result<HttpResponse, AppError> {
  let all = app_state.orders.list_all().await?;
  let status_counts = admin::status_counts(&all);
  let orders = admin::filter_orders(all, q);
  Ok(HttpResponse::Ok().json(json!({
      "message": message,
      "count": orders.len(),
      "status_counts": status_counts,
      "orders": orders
  })))
}

#[instrument(name = "handler::admin_list_orders", skip(app_state, manager, query), fields(manager_id = %manager.0.user_id()))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  manager: ManagerUser,
  query: web::Query<AdminListQuery>,
) -> Result<HttpResponse, AppError> {
  orders_response(&app_state, query.q.as_deref(), "Pedidos obtenidos.").await
}

/// Any status may be set from any other.
#[instrument(name = "handler::admin_set_order_status", skip(app_state, manager, path, req_payload), fields(manager_id = %manager.0.user_id(), order_id = %path.as_ref(), status = %req_payload.status))]
pub async fn set_order_status_handler(
  app_state: web::Data<AppState>,
  manager: ManagerUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<StatusPayload>,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let status: OrderStatus = req_payload.status.parse()?;

  if !app_state.orders.set_status(order_id, status).await? {
    return Err(AppError::NotFound(ORDER_NOT_FOUND_MESSAGE.to_string()));
  }
  info!("Order {} moved to {}.", order_id, status);

  orders_response(&app_state, None, "Estado del pedido actualizado.").await
}

// --- Users ---

async fn users_response(app_state: &AppState, q: Option<&str>, message: &str) -> Result<HttpResponse, AppError> {
  let all = app_state.profiles.list_all().await?;
  let role_counts: RoleCounts = admin::role_counts(&all);
  let users = admin::filter_profiles(all, q);
  Ok(HttpResponse::Ok().json(json!({
      "message": message,
      "count": users.len(),
      "role_counts": role_counts,
      "users": users
  })))
}

#[instrument(name = "handler::admin_list_users", skip(app_state, manager, query), fields(manager_id = %manager.0.user_id()))]
pub async fn list_users_handler(
  app_state: web::Data<AppState>,
  manager: ManagerUser,
  query: web::Query<AdminListQuery>,
) -> Result<HttpResponse, AppError> {
  users_response(&app_state, query.q.as_deref(), "Usuarios obtenidos.").await
}

#[instrument(name = "handler::admin_set_user_role", skip(app_state, manager, path, req_payload), fields(manager_id = %manager.0.user_id(), user_id = %path.as_ref(), role = %req_payload.role))]
pub async fn set_user_role_handler(
  app_state: web::Data<AppState>,
  manager: ManagerUser,
  path: web::Path<Uuid>,
  req_payload: web::Json<RolePayload>,
) -> Result<HttpResponse, AppError> {
  let user_id = path.into_inner();
  let role: Role = req_payload.role.parse()?;

  if !app_state.profiles.set_role(user_id, role).await? {
    return Err(AppError::NotFound(USER_NOT_FOUND_MESSAGE.to_string()));
  }
  info!("User {} is now {}.", user_id, role);

  users_response(&app_state, None, "Rol actualizado.").await
}

// --- Stats ---

#[instrument(name = "handler::admin_stats", skip(app_state, manager), fields(manager_id = %manager.0.user_id()))]
pub async fn stats_handler(app_state: web::Data<AppState>, manager: ManagerUser) -> Result<HttpResponse, AppError> {
  let products = app_state.products.list_all().await?;
  let orders = app_state.orders.list_all().await?;
  let users = app_state.profiles.list_all().await?;

  let stats = StoreStats::collect(&products, &orders, users.len());
  Ok(HttpResponse::Ok().json(json!({
      "message": "Estadísticas obtenidas.",
      "stats": stats
  })))
}
