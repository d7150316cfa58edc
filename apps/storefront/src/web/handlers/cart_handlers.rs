// apps/storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use motogear_core::{format_price, Cart, CartLine, CartProduct, OrderSummary, ShippingContact};

use crate::errors::AppError;
use crate::services::checkout_service::{self, CheckoutRequest};
use crate::state::AppState;
use crate::web::extractors::MaybeUser;
use crate::web::handlers::product_handlers::PRODUCT_NOT_FOUND_MESSAGE;

/// A cart as the client renders it.
#[derive(Serialize, Debug)]
pub struct CartView {
  pub cart_id: Uuid,
  pub items: Vec<CartLine>,
  pub is_open: bool,
  pub total_items: i64,
  pub summary: OrderSummary,
  pub display_subtotal: String,
  pub display_total: String,
}

impl CartView {
  fn new(cart_id: Uuid, cart: &Cart, app_state: &AppState) -> Self {
    let summary = cart.summary(&app_state.config.shipping);
    Self {
      cart_id,
      items: cart.items().to_vec(),
      is_open: cart.is_open(),
      total_items: cart.total_items(),
      display_subtotal: format_price(summary.subtotal_cents),
      display_total: format_price(summary.total_cents),
      summary,
    }
  }
}

fn respond(message: &str, cart_id: Uuid, cart: &Cart, app_state: &AppState) -> HttpResponse {
  HttpResponse::Ok().json(json!({
      "message": message,
      "cart": CartView::new(cart_id, cart, app_state),
  }))
}

#[derive(Deserialize, Debug)]
pub struct AddToCartRequestPayload {
  pub product_id: Uuid,
  #[serde(default)]
  pub quantity: Option<i32>,
}

#[derive(Deserialize, Debug)]
pub struct SetQuantityPayload {
  pub quantity: i32,
}

#[derive(Deserialize, Debug, Default)]
pub struct CartCheckoutPayload {
  #[serde(default)]
  pub shipping: Option<ShippingContact>,
}

#[instrument(name = "handler::create_cart", skip(app_state))]
pub async fn create_cart_handler(app_state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
  let cart_id = app_state.carts.create();
  let cart = app_state.carts.get(cart_id)?;
  info!("Cart session {} created.", cart_id);
  Ok(HttpResponse::Created().json(json!({
      "message": "Carrito creado.",
      "cart": CartView::new(cart_id, &cart, &app_state),
  })))
}

#[instrument(name = "handler::get_cart", skip(app_state, path), fields(cart_id = %path.as_ref()))]
pub async fn get_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let cart = app_state.carts.get(cart_id)?;
  Ok(respond("Carrito obtenido.", cart_id, &cart, &app_state))
}

#[instrument(
    name = "handler::add_to_cart",
    skip(app_state, path, req_payload),
    fields(cart_id = %path.as_ref(), product_id = %req_payload.product_id, quantity = ?req_payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  req_payload: web::Json<AddToCartRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let units = req_payload.quantity.unwrap_or(1);
  if units <= 0 {
    return Err(AppError::Validation("La cantidad debe ser mayor a cero".to_string()));
  }

  // Make sure the cart exists before touching the catalog.
  app_state.carts.get(cart_id)?;

  let product = match app_state.products.find(req_payload.product_id).await? {
    Some(p) if p.is_active => p,
    _ => {
      warn!("Add to cart rejected: product {} missing or inactive.", req_payload.product_id);
      return Err(AppError::NotFound(PRODUCT_NOT_FOUND_MESSAGE.to_string()));
    }
  };

  let snapshot = CartProduct::from(&product);
  let cart = app_state
    .carts
    .update(cart_id, |cart| cart.add_units(snapshot, units).map_err(AppError::from))?;

  info!("Cart {} now holds {} items.", cart_id, cart.total_items());
  Ok(respond("Producto agregado al carrito.", cart_id, &cart, &app_state))
}

#[instrument(
    name = "handler::set_cart_quantity",
    skip(app_state, path, req_payload),
    fields(quantity = req_payload.quantity)
)]
pub async fn set_quantity_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(Uuid, Uuid)>,
  req_payload: web::Json<SetQuantityPayload>,
) -> Result<HttpResponse, AppError> {
  let (cart_id, product_id) = path.into_inner();
  let quantity = req_payload.quantity;
  let cart = app_state
    .carts
    .update(cart_id, |cart| cart.set_quantity(product_id, quantity).map_err(AppError::from))?;
  Ok(respond("Cantidad actualizada.", cart_id, &cart, &app_state))
}

#[instrument(name = "handler::remove_from_cart", skip(app_state, path))]
pub async fn remove_from_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, AppError> {
  let (cart_id, product_id) = path.into_inner();
  let cart = app_state
    .carts
    .update(cart_id, |cart| cart.remove(product_id).map(|_| ()).map_err(AppError::from))?;
  Ok(respond("Producto eliminado del carrito.", cart_id, &cart, &app_state))
}

#[instrument(name = "handler::open_cart", skip(app_state, path), fields(cart_id = %path.as_ref()))]
pub async fn open_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let cart = app_state.carts.update(cart_id, |cart| {
    cart.open();
    Ok(())
  })?;
  Ok(respond("Carrito abierto.", cart_id, &cart, &app_state))
}

#[instrument(name = "handler::close_cart", skip(app_state, path), fields(cart_id = %path.as_ref()))]
pub async fn close_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let cart = app_state.carts.update(cart_id, |cart| {
    cart.close();
    Ok(())
  })?;
  Ok(respond("Carrito cerrado.", cart_id, &cart, &app_state))
}

#[instrument(name = "handler::clear_cart", skip(app_state, path), fields(cart_id = %path.as_ref()))]
pub async fn clear_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let cart = app_state.carts.update(cart_id, |cart| {
    cart.clear();
    Ok(())
  })?;
  Ok(respond("Carrito vaciado.", cart_id, &cart, &app_state))
}

/// Checks the cart out as-is. The cart is left untouched; the client clears
/// it once the embedded checkout reports completion.
#[instrument(name = "handler::checkout_cart", skip(app_state, path, maybe_user, req_payload), fields(cart_id = %path.as_ref()))]
pub async fn checkout_cart_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  maybe_user: MaybeUser,
  req_payload: Option<web::Json<CartCheckoutPayload>>,
) -> Result<HttpResponse, AppError> {
  let cart_id = path.into_inner();
  let cart = app_state.carts.get(cart_id)?;
  let shipping = req_payload.and_then(|p| p.into_inner().shipping);

  let request = CheckoutRequest {
    items: cart.checkout_items(),
    shipping,
  };
  let customer = maybe_user.0.as_ref().map(|u| &u.profile);
  let outcome = checkout_service::start_checkout(&app_state, customer, request).await?;

  Ok(HttpResponse::Ok().json(json!({
      "message": "Sesión de pago creada.",
      "checkout": outcome,
  })))
}
