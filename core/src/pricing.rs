// core/src/pricing.rs

//! Shipping policy, order totals and MXN price formatting.

use serde::{Deserialize, Serialize};

pub const DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS: i64 = 200_000;
pub const DEFAULT_SHIPPING_FEE_CENTS: i64 = 19_900;

/// Flat-fee shipping that becomes free once the subtotal reaches a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
  pub free_threshold_cents: i64,
  pub fee_cents: i64,
}

impl Default for ShippingPolicy {
  fn default() -> Self {
    Self {
      free_threshold_cents: DEFAULT_FREE_SHIPPING_THRESHOLD_CENTS,
      fee_cents: DEFAULT_SHIPPING_FEE_CENTS,
    }
  }
}

impl ShippingPolicy {
  /// Nothing is charged for an empty cart.
  pub fn shipping_for(&self, subtotal_cents: i64) -> i64 {
    if subtotal_cents <= 0 || subtotal_cents >= self.free_threshold_cents {
      0
    } else {
      self.fee_cents
    }
  }

  pub fn summarize(&self, subtotal_cents: i64) -> OrderSummary {
    let shipping_cents = self.shipping_for(subtotal_cents);
    OrderSummary {
      subtotal_cents,
      shipping_cents,
      total_cents: subtotal_cents.saturating_add(shipping_cents),
      free_shipping: subtotal_cents > 0 && shipping_cents == 0,
      remaining_for_free_shipping_cents: self.free_threshold_cents.saturating_sub(subtotal_cents).max(0),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
  pub subtotal_cents: i64,
  pub shipping_cents: i64,
  pub total_cents: i64,
  pub free_shipping: bool,
  pub remaining_for_free_shipping_cents: i64,
}

/// Renders centavos as whole pesos with thousands separators, e.g.
/// `$4,299 MXN`. Centavos are shown only when present.
pub fn format_price(cents: i64) -> String {
  let sign = if cents < 0 { "-" } else { "" };
  let cents = cents.unsigned_abs();
  let pesos = group_thousands(cents / 100);
  match cents % 100 {
    0 => format!("{sign}${pesos} MXN"),
    frac => format!("{sign}${pesos}.{frac:02} MXN"),
  }
}

fn group_thousands(value: u64) -> String {
  let digits = value.to_string();
  let mut out = String::with_capacity(digits.len() + digits.len() / 3);
  for (i, ch) in digits.chars().enumerate() {
    if i > 0 && (digits.len() - i) % 3 == 0 {
      out.push(',');
    }
    out.push(ch);
  }
  out
}
