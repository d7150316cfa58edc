// apps/storefront/src/state.rs
use std::sync::Arc;

use crate::config::AppConfig;
use crate::db::{AccountRepository, Backend, OrderRepository, ProductRepository, ProfileRepository};
use crate::services::cart_store::CartStore;
use crate::services::payment_gateway::PaymentGateway;

#[derive(Clone)]
pub struct AppState {
  pub products: Arc<dyn ProductRepository>,
  pub orders: Arc<dyn OrderRepository>,
  pub profiles: Arc<dyn ProfileRepository>,
  pub accounts: Arc<dyn AccountRepository>,
  pub payments: Arc<dyn PaymentGateway>,
  pub carts: Arc<CartStore>,
  pub config: Arc<AppConfig>, // Share loaded config
}

impl AppState {
  pub fn new(backend: Backend, payments: Arc<dyn PaymentGateway>, config: Arc<AppConfig>) -> Self {
    Self {
      products: backend.products,
      orders: backend.orders,
      profiles: backend.profiles,
      accounts: backend.accounts,
      payments,
      carts: Arc::new(CartStore::with_idle_ttl(config.cart_idle_ttl())),
      config,
    }
  }
}
