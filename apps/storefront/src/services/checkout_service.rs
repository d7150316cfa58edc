// apps/storefront/src/services/checkout_service.rs

//! Checkout: validate the request against the catalog, price it server-side,
//! open a gateway session and, for signed-in shoppers, record the order.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use motogear_core::checkout::normalize_items;
use motogear_core::{
  price_items, CheckoutItem, Order, OrderItem, OrderStatus, OrderSummary, PricedCheckout, PricedLine, Profile,
  ShippingContact,
};

use super::payment_gateway::SessionRequest;
use crate::errors::Result;
use crate::state::AppState;

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
  pub items: Vec<CheckoutItem>,
  #[serde(default)]
  pub shipping: Option<ShippingContact>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutOutcome {
  pub client_secret: String,
  pub session_id: String,
  pub lines: Vec<PricedLine>,
  pub summary: OrderSummary,
  /// Set when a pending order was recorded for the signed-in shopper.
  pub order_id: Option<Uuid>,
}

#[instrument(
  name = "checkout_service::start_checkout",
  skip(state, customer, request),
  fields(user_id = ?customer.map(|c| c.id), requested_lines = request.items.len())
)]
pub async fn start_checkout(
  state: &AppState,
  customer: Option<&Profile>,
  request: CheckoutRequest,
) -> Result<CheckoutOutcome> {
  let items = normalize_items(&request.items)?;
  let ids: Vec<Uuid> = items.iter().map(|i| i.product_id).collect();
  let catalog = state.products.find_many(&ids).await?;

  let priced: PricedCheckout = price_items(&items, &catalog, &state.config.shipping)?;

  let shipping = match (customer, request.shipping) {
    (Some(_), Some(contact)) => {
      contact.validate()?;
      Some(contact)
    }
    (None, Some(_)) => {
      warn!("Shipping contact sent without a session; no order will be recorded.");
      None
    }
    (_, None) => None,
  };

  let session_request = SessionRequest {
    currency: state.config.currency.clone(),
    lines: priced.lines.clone(),
    shipping_cents: priced.summary.shipping_cents,
    customer_email: shipping
      .as_ref()
      .map(|s| s.email.trim().to_string())
      .or_else(|| customer.map(|c| c.email.clone())),
  };
  let session = state
    .payments
    .create_checkout_session(&session_request)
    .await
    .map_err(|e| {
      error!(gateway = state.payments.name(), error = %e, "Failed to create checkout session.");
      e
    })?;

  let order_id = match (customer, shipping) {
    (Some(customer), Some(contact)) => {
      Some(record_pending_order(state, customer, &contact, &priced, &session.id).await?)
    }
    _ => None,
  };

  info!(
    session_id = %session.id,
    total_cents = priced.total_cents(),
    order_id = ?order_id,
    "Checkout session ready."
  );
  Ok(CheckoutOutcome {
    client_secret: session.client_secret,
    session_id: session.id,
    lines: priced.lines,
    summary: priced.summary,
    order_id,
  })
}

async fn record_pending_order(
  state: &AppState,
  customer: &Profile,
  contact: &ShippingContact,
  priced: &PricedCheckout,
  session_id: &str,
) -> Result<Uuid> {
  let order = Order {
    id: Uuid::new_v4(),
    user_id: customer.id,
    status: OrderStatus::Pending,
    total_cents: priced.total_cents(),
    shipping_name: contact.name.trim().to_string(),
    shipping_email: contact.email.trim().to_string(),
    payment_session_id: Some(session_id.to_string()),
    created_at: Utc::now(),
  };
  let items: Vec<OrderItem> = priced
    .lines
    .iter()
    .map(|line| OrderItem {
      id: Uuid::new_v4(),
      order_id: order.id,
      product_id: line.product_id,
      product_name: line.name.clone(),
      quantity: line.quantity,
      unit_price_cents: line.unit_price_cents,
    })
    .collect();

  state.orders.create(&order, &items).await?;
  Ok(order.id)
}
