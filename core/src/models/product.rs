// core/src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

/// Highest accepted price, one billion pesos. Keeps every cart and order
/// total well inside `i64`.
pub const MAX_PRICE_CENTS: i64 = 100_000_000_000;
pub const MAX_STOCK: i32 = 1_000_000;

/// A catalog row. Money is carried in centavos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
  pub id: Uuid,
  pub name: String,
  pub description: String,
  pub price_cents: i64,
  pub original_price_cents: Option<i64>,
  pub category: String,
  pub image_url: String,
  pub rating: f64,
  pub reviews_count: i32,
  pub stock: i32,
  pub is_active: bool,
  pub is_featured: bool,
  pub discount_percentage: i32,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

impl Product {
  /// Whether `quantity` units can be sold right now.
  pub fn is_available(&self, quantity: i32) -> bool {
    self.is_active && self.stock >= quantity
  }

  pub fn is_on_offer(&self) -> bool {
    self.is_active && self.discount_percentage > 0
  }
}

fn default_active() -> bool {
  true
}

/// Fields a manager may set when creating or editing a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductInput {
  pub name: String,
  #[serde(default)]
  pub description: String,
  pub price_cents: i64,
  #[serde(default)]
  pub original_price_cents: Option<i64>,
  pub category: String,
  #[serde(default)]
  pub image_url: String,
  #[serde(default)]
  pub rating: f64,
  #[serde(default)]
  pub reviews_count: i32,
  pub stock: i32,
  #[serde(default = "default_active")]
  pub is_active: bool,
  #[serde(default)]
  pub is_featured: bool,
  #[serde(default)]
  pub discount_percentage: i32,
}

impl ProductInput {
  /// Checks the record invariants: price and stock within their caps,
  /// discount within 0..=100, rating within 0..=5, and non-blank name and
  /// category.
  pub fn validate(&self) -> Result<(), CoreError> {
    if self.name.trim().is_empty() {
      return Err(CoreError::InvalidProduct("el nombre es obligatorio".to_string()));
    }
    if self.category.trim().is_empty() {
      return Err(CoreError::InvalidProduct("la categoría es obligatoria".to_string()));
    }
    if self.price_cents < 0 {
      return Err(CoreError::InvalidProduct("el precio no puede ser negativo".to_string()));
    }
    if self.price_cents > MAX_PRICE_CENTS {
      return Err(CoreError::InvalidProduct("el precio excede el máximo permitido".to_string()));
    }
    match self.original_price_cents {
      Some(p) if p < 0 => {
        return Err(CoreError::InvalidProduct(
          "el precio original no puede ser negativo".to_string(),
        ))
      }
      Some(p) if p > MAX_PRICE_CENTS => {
        return Err(CoreError::InvalidProduct(
          "el precio original excede el máximo permitido".to_string(),
        ))
      }
      _ => {}
    }
    if self.stock < 0 {
      return Err(CoreError::InvalidProduct("el stock no puede ser negativo".to_string()));
    }
    if self.stock > MAX_STOCK {
      return Err(CoreError::InvalidProduct("el stock excede el máximo permitido".to_string()));
    }
    if !(0..=100).contains(&self.discount_percentage) {
      return Err(CoreError::InvalidProduct(
        "el descuento debe estar entre 0 y 100".to_string(),
      ));
    }
    if !(0.0..=5.0).contains(&self.rating) {
      return Err(CoreError::InvalidProduct(
        "la calificación debe estar entre 0 y 5".to_string(),
      ));
    }
    if self.reviews_count < 0 {
      return Err(CoreError::InvalidProduct(
        "el número de reseñas no puede ser negativo".to_string(),
      ));
    }
    Ok(())
  }

  /// Builds a brand-new row. Call [`ProductInput::validate`] first.
  pub fn into_product(self, id: Uuid, now: DateTime<Utc>) -> Product {
    Product {
      id,
      name: self.name.trim().to_string(),
      description: self.description,
      price_cents: self.price_cents,
      original_price_cents: self.original_price_cents,
      category: self.category.trim().to_string(),
      image_url: self.image_url,
      rating: self.rating,
      reviews_count: self.reviews_count,
      stock: self.stock,
      is_active: self.is_active,
      is_featured: self.is_featured,
      discount_percentage: self.discount_percentage,
      created_at: now,
      updated_at: now,
    }
  }
}

/// Tells an absent field (`None`) apart from an explicit `null`
/// (`Some(None)`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
  D: Deserializer<'de>,
  T: Deserialize<'de>,
{
  Option::<T>::deserialize(deserializer).map(Some)
}

/// A partial edit. Fields left out of the request keep their stored value;
/// `original_price_cents: null` clears the struck-through price.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductUpdate {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price_cents: Option<i64>,
  #[serde(default, deserialize_with = "present")]
  pub original_price_cents: Option<Option<i64>>,
  pub category: Option<String>,
  pub image_url: Option<String>,
  pub rating: Option<f64>,
  pub reviews_count: Option<i32>,
  pub stock: Option<i32>,
  pub is_active: Option<bool>,
  pub is_featured: Option<bool>,
  pub discount_percentage: Option<i32>,
}

impl ProductUpdate {
  /// The full record this edit would leave behind.
  pub fn merge(self, existing: &Product) -> ProductInput {
    ProductInput {
      name: self.name.unwrap_or_else(|| existing.name.clone()),
      description: self.description.unwrap_or_else(|| existing.description.clone()),
      price_cents: self.price_cents.unwrap_or(existing.price_cents),
      original_price_cents: self.original_price_cents.unwrap_or(existing.original_price_cents),
      category: self.category.unwrap_or_else(|| existing.category.clone()),
      image_url: self.image_url.unwrap_or_else(|| existing.image_url.clone()),
      rating: self.rating.unwrap_or(existing.rating),
      reviews_count: self.reviews_count.unwrap_or(existing.reviews_count),
      stock: self.stock.unwrap_or(existing.stock),
      is_active: self.is_active.unwrap_or(existing.is_active),
      is_featured: self.is_featured.unwrap_or(existing.is_featured),
      discount_percentage: self.discount_percentage.unwrap_or(existing.discount_percentage),
    }
  }

  /// Merges the edit into `existing` and validates the result. The id and
  /// creation time are kept.
  pub fn apply_to(self, existing: &Product, now: DateTime<Utc>) -> Result<Product, CoreError> {
    let merged = self.merge(existing);
    merged.validate()?;
    let mut updated = merged.into_product(existing.id, now);
    updated.created_at = existing.created_at;
    Ok(updated)
  }
}
