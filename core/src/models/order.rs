// core/src/models/order.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Lifecycle label of an order. Any status may follow any other; staff move
/// orders by hand.
///
/// Wire and database values are the storefront's Spanish labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "order_status"))]
pub enum OrderStatus {
  #[serde(rename = "pendiente")]
  #[cfg_attr(feature = "sqlx", sqlx(rename = "pendiente"))]
  Pending,
  #[serde(rename = "procesando")]
  #[cfg_attr(feature = "sqlx", sqlx(rename = "procesando"))]
  Processing,
  #[serde(rename = "enviado")]
  #[cfg_attr(feature = "sqlx", sqlx(rename = "enviado"))]
  Shipped,
  #[serde(rename = "entregado")]
  #[cfg_attr(feature = "sqlx", sqlx(rename = "entregado"))]
  Delivered,
  #[serde(rename = "cancelado")]
  #[cfg_attr(feature = "sqlx", sqlx(rename = "cancelado"))]
  Cancelled,
}

impl OrderStatus {
  pub const ALL: [OrderStatus; 5] = [
    OrderStatus::Pending,
    OrderStatus::Processing,
    OrderStatus::Shipped,
    OrderStatus::Delivered,
    OrderStatus::Cancelled,
  ];

  pub fn as_str(&self) -> &'static str {
    match self {
      OrderStatus::Pending => "pendiente",
      OrderStatus::Processing => "procesando",
      OrderStatus::Shipped => "enviado",
      OrderStatus::Delivered => "entregado",
      OrderStatus::Cancelled => "cancelado",
    }
  }

  /// Cancelled orders do not count towards revenue.
  pub fn counts_as_revenue(&self) -> bool {
    !matches!(self, OrderStatus::Cancelled)
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for OrderStatus {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "pendiente" | "pending" => Ok(OrderStatus::Pending),
      "procesando" | "processing" => Ok(OrderStatus::Processing),
      "enviado" | "shipped" => Ok(OrderStatus::Shipped),
      "entregado" | "delivered" => Ok(OrderStatus::Delivered),
      "cancelado" | "cancelled" => Ok(OrderStatus::Cancelled),
      other => Err(CoreError::UnknownStatus(other.to_string())),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub status: OrderStatus,
  pub total_cents: i64,
  pub shipping_name: String,
  pub shipping_email: String,
  pub payment_session_id: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// A purchased line, frozen at the unit price charged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderItem {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub product_name: String,
  pub quantity: i32,
  pub unit_price_cents: i64,
}

impl OrderItem {
  pub fn line_total_cents(&self) -> i64 {
    self.unit_price_cents.saturating_mul(i64::from(self.quantity))
  }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderWithItems {
  #[serde(flatten)]
  pub order: Order,
  pub items: Vec<OrderItem>,
}

/// Name and email the parcel is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingContact {
  pub name: String,
  pub email: String,
}

impl ShippingContact {
  pub fn validate(&self) -> Result<(), CoreError> {
    if self.name.trim().is_empty() {
      return Err(CoreError::InvalidContact("el nombre es obligatorio".to_string()));
    }
    if !is_plausible_email(&self.email) {
      return Err(CoreError::InvalidContact("correo electrónico inválido".to_string()));
    }
    Ok(())
  }
}

/// Cheap shape check: one `@`, something before it and a dotted domain after.
pub fn is_plausible_email(email: &str) -> bool {
  let email = email.trim();
  let Some((local, domain)) = email.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && domain.contains('.')
    && !domain.starts_with('.')
    && !domain.ends_with('.')
    && !email.chars().any(char::is_whitespace)
}
