// apps/storefront/src/web/handlers/checkout_handlers.rs

use actix_web::{web, HttpResponse};
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::checkout_service::{self, CheckoutRequest};
use crate::state::AppState;
use crate::web::extractors::MaybeUser;

#[instrument(
    name = "handler::start_checkout",
    skip(app_state, maybe_user, req_payload),
    fields(user_id = ?maybe_user.0.as_ref().map(|u| u.user_id()), lines = req_payload.items.len())
)]
pub async fn start_checkout_handler(
  app_state: web::Data<AppState>,
  maybe_user: MaybeUser,
  req_payload: web::Json<CheckoutRequest>,
) -> Result<HttpResponse, AppError> {
  let customer = maybe_user.0.as_ref().map(|u| &u.profile);
  let outcome = checkout_service::start_checkout(&app_state, customer, req_payload.into_inner()).await?;

  info!("Checkout session {} handed to the client.", outcome.session_id);
  Ok(HttpResponse::Ok().json(json!({
      "message": "Sesión de pago creada.",
      "checkout": outcome,
  })))
}
