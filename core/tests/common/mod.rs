// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use chrono::{DateTime, Duration, TimeZone, Utc};
use motogear_core::{Product, ProductInput};
use once_cell::sync::Lazy;
use tracing::Level;
use uuid::Uuid;

// --- Tracing Setup for Tests ---
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer()
    .try_init()
    .ok();
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}

pub fn epoch() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap()
}

/// An active product with 25 units, created `minute` minutes after `epoch()`.
pub fn product(name: &str, price_cents: i64, category: &str, minute: i64) -> Product {
  ProductInput {
    name: name.to_string(),
    description: format!("{} de prueba", name),
    price_cents,
    original_price_cents: None,
    category: category.to_string(),
    image_url: String::new(),
    rating: 4.5,
    reviews_count: 10,
    stock: 25,
    is_active: true,
    is_featured: false,
    discount_percentage: 0,
  }
  .into_product(Uuid::new_v4(), epoch() + Duration::minutes(minute))
}

/// Helmet, gloves and phone mount at launch prices.
pub fn small_catalog() -> Vec<Product> {
  vec![
    product("Casco Pro Carbon", 429_900, "cascos", 0),
    product("Guantes Racing Pro", 129_900, "equipamiento", 1),
    product("Soporte Movil Pro", 89_900, "accesorios", 2),
  ]
}
