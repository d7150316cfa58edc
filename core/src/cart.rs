// core/src/cart.rs

//! The shopping cart container.
//!
//! A cart is an ordered list of product snapshots with quantities plus the
//! open/closed flag of the cart drawer. Every line always carries a quantity
//! within `1..=MAX_LINE_QUANTITY`; operations that would take it to zero drop
//! the line instead.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checkout::CheckoutItem;
use crate::error::CartError;
use crate::models::Product;
use crate::pricing::{OrderSummary, ShippingPolicy};

/// Most units of one product a cart line (or a checkout line) may hold.
pub const MAX_LINE_QUANTITY: i32 = 999;

/// The product fields a cart line needs to render and total itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartProduct {
  pub id: Uuid,
  pub name: String,
  pub price_cents: i64,
  pub image_url: String,
}

impl From<&Product> for CartProduct {
  fn from(product: &Product) -> Self {
    Self {
      id: product.id,
      name: product.name.clone(),
      price_cents: product.price_cents,
      image_url: product.image_url.clone(),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
  pub product: CartProduct,
  pub quantity: i32,
}

impl CartLine {
  /// Saturates instead of overflowing. Checkout reprices and rejects such
  /// amounts.
  pub fn line_total_cents(&self) -> i64 {
    self.product.price_cents.saturating_mul(i64::from(self.quantity))
  }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
  items: Vec<CartLine>,
  is_open: bool,
}

impl Cart {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn items(&self) -> &[CartLine] {
    &self.items
  }

  pub fn is_open(&self) -> bool {
    self.is_open
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn quantity_of(&self, product_id: Uuid) -> Option<i32> {
    self.line(product_id).map(|l| l.quantity)
  }

  /// Adds one unit, appending a new line at the end when the product is not
  /// in the cart yet.
  pub fn add(&mut self, product: CartProduct) -> Result<(), CartError> {
    self.add_units(product, 1)
  }

  /// Adds `units` of a product. Non-positive counts are ignored. Fails,
  /// leaving the cart untouched, when the line would exceed
  /// [`MAX_LINE_QUANTITY`].
  pub fn add_units(&mut self, product: CartProduct, units: i32) -> Result<(), CartError> {
    if units <= 0 {
      return Ok(());
    }
    let current = self.quantity_of(product.id).unwrap_or(0);
    let quantity = current.saturating_add(units);
    if quantity > MAX_LINE_QUANTITY {
      return Err(CartError::QuantityTooLarge { product_id: product.id, max: MAX_LINE_QUANTITY });
    }
    match self.items.iter_mut().find(|l| l.product.id == product.id) {
      Some(line) => line.quantity = quantity,
      None => self.items.push(CartLine { product, quantity }),
    }
    Ok(())
  }

  pub fn remove(&mut self, product_id: Uuid) -> Result<CartLine, CartError> {
    let idx = self
      .items
      .iter()
      .position(|l| l.product.id == product_id)
      .ok_or(CartError::LineNotFound(product_id))?;
    Ok(self.items.remove(idx))
  }

  /// Sets the quantity of an existing line. Zero or below removes the line,
  /// whether or not it was present.
  pub fn set_quantity(&mut self, product_id: Uuid, quantity: i32) -> Result<(), CartError> {
    if quantity <= 0 {
      self.items.retain(|l| l.product.id != product_id);
      return Ok(());
    }
    if quantity > MAX_LINE_QUANTITY {
      return Err(CartError::QuantityTooLarge { product_id, max: MAX_LINE_QUANTITY });
    }
    let line = self
      .items
      .iter_mut()
      .find(|l| l.product.id == product_id)
      .ok_or(CartError::LineNotFound(product_id))?;
    line.quantity = quantity;
    Ok(())
  }

  pub fn open(&mut self) {
    self.is_open = true;
  }

  pub fn close(&mut self) {
    self.is_open = false;
  }

  pub fn clear(&mut self) {
    self.items.clear();
  }

  pub fn total_items(&self) -> i64 {
    self.items.iter().map(|l| i64::from(l.quantity)).sum()
  }

  pub fn subtotal_cents(&self) -> i64 {
    self.items.iter().map(CartLine::line_total_cents).fold(0, i64::saturating_add)
  }

  pub fn summary(&self, policy: &ShippingPolicy) -> OrderSummary {
    policy.summarize(self.subtotal_cents())
  }

  /// The request a checkout is started with. Prices stay behind; the
  /// checkout reprices every line from the catalog.
  pub fn checkout_items(&self) -> Vec<CheckoutItem> {
    self
      .items
      .iter()
      .map(|l| CheckoutItem { product_id: l.product.id, quantity: l.quantity })
      .collect()
  }

  fn line(&self, product_id: Uuid) -> Option<&CartLine> {
    self.items.iter().find(|l| l.product.id == product_id)
  }
}
