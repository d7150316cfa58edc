// core/src/checkout.rs

//! Server-side pricing of a checkout request.
//!
//! Clients only say *what* they want and *how many*; every amount is taken
//! from the catalog record. Any price field a client adds is ignored by
//! deserialization.

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::cart::MAX_LINE_QUANTITY;
use crate::error::CheckoutError;
use crate::models::Product;
use crate::pricing::{OrderSummary, ShippingPolicy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutItem {
  #[serde(alias = "productId")]
  pub product_id: Uuid,
  pub quantity: i32,
}

/// A line priced from the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedLine {
  pub product_id: Uuid,
  pub name: String,
  pub description: String,
  pub image_url: String,
  pub unit_price_cents: i64,
  pub quantity: i32,
}

impl PricedLine {
  pub fn checked_line_total_cents(&self) -> Option<i64> {
    self.unit_price_cents.checked_mul(i64::from(self.quantity))
  }

  /// Lines built by [`price_items`] never saturate.
  pub fn line_total_cents(&self) -> i64 {
    self.unit_price_cents.saturating_mul(i64::from(self.quantity))
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricedCheckout {
  pub lines: Vec<PricedLine>,
  pub summary: OrderSummary,
}

impl PricedCheckout {
  pub fn subtotal_cents(&self) -> i64 {
    self.summary.subtotal_cents
  }

  pub fn total_cents(&self) -> i64 {
    self.summary.total_cents
  }
}

/// Rejects empty requests and quantities outside `1..=MAX_LINE_QUANTITY`,
/// then folds repeated product ids into one line, keeping first-seen order.
/// The merged quantity is held to the same bound.
pub fn normalize_items(items: &[CheckoutItem]) -> Result<Vec<CheckoutItem>, CheckoutError> {
  if items.is_empty() {
    return Err(CheckoutError::EmptyCart);
  }
  let mut merged: Vec<CheckoutItem> = Vec::with_capacity(items.len());
  for item in items {
    let quantity = match merged.iter().find(|m| m.product_id == item.product_id) {
      Some(existing) if item.quantity > 0 => existing.quantity.saturating_add(item.quantity),
      _ => item.quantity,
    };
    if item.quantity <= 0 || quantity > MAX_LINE_QUANTITY {
      return Err(CheckoutError::InvalidQuantity { product_id: item.product_id, quantity });
    }
    match merged.iter_mut().find(|m| m.product_id == item.product_id) {
      Some(existing) => existing.quantity = quantity,
      None => merged.push(*item),
    }
  }
  Ok(merged)
}

/// Prices `items` against the catalog rows fetched for them.
///
/// Fails on the first id missing from `catalog`, on inactive products, on
/// quantities above the current stock and on totals that do not fit in `i64`.
pub fn price_items(
  items: &[CheckoutItem],
  catalog: &[Product],
  policy: &ShippingPolicy,
) -> Result<PricedCheckout, CheckoutError> {
  let items = normalize_items(items)?;
  let mut lines = Vec::with_capacity(items.len());

  for item in &items {
    let product = catalog
      .iter()
      .find(|p| p.id == item.product_id)
      .ok_or(CheckoutError::UnknownProduct(item.product_id))?;

    if !product.is_active {
      return Err(CheckoutError::Unavailable { name: product.name.clone() });
    }
    if !product.is_available(item.quantity) {
      return Err(CheckoutError::InsufficientStock {
        name: product.name.clone(),
        available: product.stock,
      });
    }

    lines.push(PricedLine {
      product_id: product.id,
      name: product.name.clone(),
      description: product.description.clone(),
      image_url: product.image_url.clone(),
      unit_price_cents: product.price_cents,
      quantity: item.quantity,
    });
  }

  let subtotal = lines
    .iter()
    .try_fold(0i64, |acc, line| line.checked_line_total_cents()?.checked_add(acc))
    .ok_or(CheckoutError::AmountTooLarge)?;
  subtotal
    .checked_add(policy.shipping_for(subtotal))
    .ok_or(CheckoutError::AmountTooLarge)?;
  debug!(lines = lines.len(), subtotal_cents = subtotal, "Checkout priced from catalog.");
  Ok(PricedCheckout { lines, summary: policy.summarize(subtotal) })
}
