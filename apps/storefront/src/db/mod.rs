// apps/storefront/src/db/mod.rs

//! Repository seams over the data backend.
//!
//! Handlers and services only see these traits. `postgres` implements them
//! with runtime sqlx queries, `memory` with `parking_lot` locked maps.

pub mod memory;
pub mod postgres;
pub mod seed;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use motogear_core::{Order, OrderItem, OrderStatus, OrderWithItems, Product, Profile, Role};

use crate::errors::Result;

pub const DUPLICATE_EMAIL_MESSAGE: &str = "Este correo ya está registrado";

#[async_trait]
pub trait ProductRepository: Send + Sync {
  /// Active products in catalog order (oldest first).
  async fn list_active(&self) -> Result<Vec<Product>>;
  /// Every product, newest first.
  async fn list_all(&self) -> Result<Vec<Product>>;
  async fn find(&self, id: Uuid) -> Result<Option<Product>>;
  /// Rows for the given ids, in no particular order. Unknown ids are skipped.
  async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Product>>;
  async fn insert(&self, product: &Product) -> Result<()>;
  /// Returns `false` when no row has that id.
  async fn update(&self, product: &Product) -> Result<bool>;
  async fn set_active(&self, id: Uuid, is_active: bool, now: DateTime<Utc>) -> Result<bool>;
  async fn delete(&self, id: Uuid) -> Result<bool>;
}

#[async_trait]
pub trait OrderRepository: Send + Sync {
  async fn create(&self, order: &Order, items: &[OrderItem]) -> Result<()>;
  /// Every order, newest first.
  async fn list_all(&self) -> Result<Vec<Order>>;
  /// One user's orders, newest first.
  async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>>;
  async fn find_with_items(&self, id: Uuid) -> Result<Option<OrderWithItems>>;
  async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<bool>;
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
  /// Every profile, newest first.
  async fn list_all(&self) -> Result<Vec<Profile>>;
  async fn find(&self, id: Uuid) -> Result<Option<Profile>>;
  async fn set_role(&self, id: Uuid, role: Role) -> Result<bool>;
}

/// The stored half of a sign-in check.
#[derive(Debug, Clone)]
pub struct Credentials {
  pub user_id: Uuid,
  pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct Session {
  pub token: String,
  pub user_id: Uuid,
  pub created_at: DateTime<Utc>,
  pub expires_at: DateTime<Utc>,
}

/// Accounts and bearer sessions.
#[async_trait]
pub trait AccountRepository: Send + Sync {
  /// Stores the login and its profile together. An email already in use
  /// fails with `AppError::Conflict`.
  async fn create_account(&self, profile: &Profile, password_hash: &str) -> Result<()>;
  /// Looks the login up by email, case-insensitively.
  async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>>;
  /// Stores `session` and drops every session already expired at its
  /// `created_at`.
  async fn create_session(&self, session: &Session) -> Result<()>;
  /// The profile behind an unexpired token. An expired token is deleted.
  async fn resolve_session(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Profile>>;
  async fn revoke_session(&self, token: &str) -> Result<bool>;
}

/// One handle per repository, all backed by the same store.
#[derive(Clone)]
pub struct Backend {
  pub products: Arc<dyn ProductRepository>,
  pub orders: Arc<dyn OrderRepository>,
  pub profiles: Arc<dyn ProfileRepository>,
  pub accounts: Arc<dyn AccountRepository>,
}

impl Backend {
  pub fn from_store<S>(store: Arc<S>) -> Self
  where
    S: ProductRepository + OrderRepository + ProfileRepository + AccountRepository + 'static,
  {
    Self {
      products: store.clone(),
      orders: store.clone(),
      profiles: store.clone(),
      accounts: store,
    }
  }
}
