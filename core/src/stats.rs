// core/src/stats.rs

use serde::Serialize;

use crate::models::{Order, Product};

/// Dashboard figures for the admin panel.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StoreStats {
  pub total_products: usize,
  pub active_products: usize,
  pub total_orders: usize,
  /// Sum of order totals, cancelled orders excluded.
  pub revenue_cents: i64,
  pub total_users: usize,
  /// Revenue divided by the number of orders (all statuses), 0 without orders.
  pub average_order_cents: i64,
}

impl StoreStats {
  pub fn collect(products: &[Product], orders: &[Order], total_users: usize) -> Self {
    let revenue_cents: i64 = orders
      .iter()
      .filter(|o| o.status.counts_as_revenue())
      .map(|o| o.total_cents)
      .sum();
    let average_order_cents = match orders.len() {
      0 => 0,
      n => revenue_cents / n as i64,
    };
    Self {
      total_products: products.len(),
      active_products: products.iter().filter(|p| p.is_active).count(),
      total_orders: orders.len(),
      revenue_cents,
      total_users,
      average_order_cents,
    }
  }
}
