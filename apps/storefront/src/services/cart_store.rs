// apps/storefront/src/services/cart_store.rs

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use tracing::debug;
use uuid::Uuid;

use motogear_core::Cart;

use crate::errors::{AppError, Result};

pub const CART_NOT_FOUND_MESSAGE: &str = "Carrito no encontrado";
pub const DEFAULT_CART_IDLE_TTL_HOURS: i64 = 24;

struct CartEntry {
  cart: Cart,
  last_touched: DateTime<Utc>,
}

/// Carts keyed by cart-session id, held in process memory only. A restart
/// empties every cart.
///
/// A cart not read or changed for `idle_ttl` is gone: lookups treat it as
/// unknown and `create` sweeps it out of the map.
pub struct CartStore {
  carts: RwLock<HashMap<Uuid, CartEntry>>,
  idle_ttl: Duration,
}

impl Default for CartStore {
  fn default() -> Self {
    Self::with_idle_ttl(Duration::hours(DEFAULT_CART_IDLE_TTL_HOURS))
  }
}

impl CartStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_idle_ttl(idle_ttl: Duration) -> Self {
    Self { carts: RwLock::new(HashMap::new()), idle_ttl }
  }

  pub fn create(&self) -> Uuid {
    self.create_at(Utc::now())
  }

  pub fn get(&self, id: Uuid) -> Result<Cart> {
    self.get_at(id, Utc::now())
  }

  /// Runs `f` on the cart under the write lock and returns the cart as it
  /// stands afterwards. `f` must not block.
  pub fn update<F>(&self, id: Uuid, f: F) -> Result<Cart>
  where
    F: FnOnce(&mut Cart) -> Result<()>,
  {
    self.update_at(id, Utc::now(), f)
  }

  fn is_expired(&self, entry: &CartEntry, now: DateTime<Utc>) -> bool {
    now - entry.last_touched > self.idle_ttl
  }

  fn create_at(&self, now: DateTime<Utc>) -> Uuid {
    let id = Uuid::new_v4();
    let mut carts = self.carts.write();
    let before = carts.len();
    carts.retain(|_, entry| !self.is_expired(entry, now));
    let swept = before - carts.len();
    if swept > 0 {
      debug!(swept, "Idle carts dropped.");
    }
    carts.insert(id, CartEntry { cart: Cart::new(), last_touched: now });
    debug!(cart_id = %id, "Cart session created.");
    id
  }

  fn get_at(&self, id: Uuid, now: DateTime<Utc>) -> Result<Cart> {
    self.update_at(id, now, |_| Ok(()))
  }

  fn update_at<F>(&self, id: Uuid, now: DateTime<Utc>, f: F) -> Result<Cart>
  where
    F: FnOnce(&mut Cart) -> Result<()>,
  {
    let mut carts = self.carts.write();
    let entry = carts
      .get_mut(&id)
      .filter(|entry| !self.is_expired(entry, now))
      .ok_or_else(|| AppError::NotFound(CART_NOT_FOUND_MESSAGE.to_string()))?;
    entry.last_touched = now;
    f(&mut entry.cart)?;
    Ok(entry.cart.clone())
  }
}
