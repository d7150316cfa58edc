// apps/storefront/src/db/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::{debug, instrument};
use uuid::Uuid;

use motogear_core::{Order, OrderItem, OrderStatus, OrderWithItems, Product, Profile, Role};

use super::{
  AccountRepository, Credentials, OrderRepository, ProductRepository, ProfileRepository, Session,
  DUPLICATE_EMAIL_MESSAGE,
};
use crate::errors::{AppError, Result};

#[derive(Default)]
struct Tables {
  products: Vec<Product>,
  orders: Vec<Order>,
  order_items: Vec<OrderItem>,
  profiles: Vec<Profile>,
  // Keyed by lowercased email.
  credentials: HashMap<String, Credentials>,
  sessions: HashMap<String, Session>,
}

/// Process-local backend. Locks are only held for the duration of a
/// synchronous read or write, never across an `.await`.
#[derive(Default)]
pub struct MemoryStore {
  tables: RwLock<Tables>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }
}

fn newest_first<T, F>(mut rows: Vec<T>, created_at: F) -> Vec<T>
where
  F: Fn(&T) -> DateTime<Utc>,
{
  rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
  rows
}

#[async_trait]
impl ProductRepository for MemoryStore {
  async fn list_active(&self) -> Result<Vec<Product>> {
    let mut rows: Vec<Product> = self.tables.read().products.iter().filter(|p| p.is_active).cloned().collect();
    rows.sort_by_key(|p| p.created_at);
    Ok(rows)
  }

  async fn list_all(&self) -> Result<Vec<Product>> {
    let rows = self.tables.read().products.clone();
    Ok(newest_first(rows, |p| p.created_at))
  }

  async fn find(&self, id: Uuid) -> Result<Option<Product>> {
    Ok(self.tables.read().products.iter().find(|p| p.id == id).cloned())
  }

  async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Product>> {
    let tables = self.tables.read();
    Ok(tables.products.iter().filter(|p| ids.contains(&p.id)).cloned().collect())
  }

  #[instrument(name = "memory::insert_product", skip(self, product), fields(product_id = %product.id))]
  async fn insert(&self, product: &Product) -> Result<()> {
    let mut tables = self.tables.write();
    if tables.products.iter().any(|p| p.id == product.id) {
      return Err(AppError::Conflict(format!("El producto {} ya existe", product.id)));
    }
    tables.products.push(product.clone());
    debug!("Product stored in memory.");
    Ok(())
  }

  async fn update(&self, product: &Product) -> Result<bool> {
    let mut tables = self.tables.write();
    match tables.products.iter_mut().find(|p| p.id == product.id) {
      Some(existing) => {
        *existing = product.clone();
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn set_active(&self, id: Uuid, is_active: bool, now: DateTime<Utc>) -> Result<bool> {
    let mut tables = self.tables.write();
    match tables.products.iter_mut().find(|p| p.id == id) {
      Some(existing) => {
        existing.is_active = is_active;
        existing.updated_at = now;
        Ok(true)
      }
      None => Ok(false),
    }
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let mut tables = self.tables.write();
    let before = tables.products.len();
    tables.products.retain(|p| p.id != id);
    Ok(tables.products.len() != before)
  }
}

#[async_trait]
impl OrderRepository for MemoryStore {
  #[instrument(name = "memory::create_order", skip(self, order, items), fields(order_id = %order.id, lines = items.len()))]
  async fn create(&self, order: &Order, items: &[OrderItem]) -> Result<()> {
    let mut tables = self.tables.write();
    tables.orders.push(order.clone());
    tables.order_items.extend_from_slice(items);
    debug!("Order stored in memory.");
    Ok(())
  }

  async fn list_all(&self) -> Result<Vec<Order>> {
    let rows = self.tables.read().orders.clone();
    Ok(newest_first(rows, |o| o.created_at))
  }

  async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let rows: Vec<Order> = self.tables.read().orders.iter().filter(|o| o.user_id == user_id).cloned().collect();
    Ok(newest_first(rows, |o| o.created_at))
  }

  async fn find_with_items(&self, id: Uuid) -> Result<Option<OrderWithItems>> {
    let tables = self.tables.read();
    Ok(tables.orders.iter().find(|o| o.id == id).map(|order| OrderWithItems {
      order: order.clone(),
      items: tables.order_items.iter().filter(|i| i.order_id == id).cloned().collect(),
    }))
  }

  async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<bool> {
    let mut tables = self.tables.write();
    match tables.orders.iter_mut().find(|o| o.id == id) {
      Some(order) => {
        order.status = status;
        Ok(true)
      }
      None => Ok(false),
    }
  }
}

#[async_trait]
impl ProfileRepository for MemoryStore {
  async fn list_all(&self) -> Result<Vec<Profile>> {
    let rows = self.tables.read().profiles.clone();
    Ok(newest_first(rows, |p| p.created_at))
  }

  async fn find(&self, id: Uuid) -> Result<Option<Profile>> {
    Ok(self.tables.read().profiles.iter().find(|p| p.id == id).cloned())
  }

  async fn set_role(&self, id: Uuid, role: Role) -> Result<bool> {
    let mut tables = self.tables.write();
    match tables.profiles.iter_mut().find(|p| p.id == id) {
      Some(profile) => {
        profile.role = role;
        Ok(true)
      }
      None => Ok(false),
    }
  }
}

#[async_trait]
impl AccountRepository for MemoryStore {
  #[instrument(name = "memory::create_account", skip(self, profile, password_hash), fields(user_id = %profile.id))]
  async fn create_account(&self, profile: &Profile, password_hash: &str) -> Result<()> {
    let key = profile.email.trim().to_lowercase();
    let mut tables = self.tables.write();
    if tables.credentials.contains_key(&key) {
      return Err(AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string()));
    }
    tables.credentials.insert(
      key,
      Credentials {
        user_id: profile.id,
        password_hash: password_hash.to_string(),
      },
    );
    tables.profiles.push(profile.clone());
    Ok(())
  }

  async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>> {
    let key = email.trim().to_lowercase();
    Ok(self.tables.read().credentials.get(&key).cloned())
  }

  async fn create_session(&self, session: &Session) -> Result<()> {
    let mut tables = self.tables.write();
    let before = tables.sessions.len();
    tables.sessions.retain(|_, s| s.expires_at > session.created_at);
    let purged = before - tables.sessions.len();
    if purged > 0 {
      debug!(purged, "Expired sessions deleted.");
    }
    tables.sessions.insert(session.token.clone(), session.clone());
    Ok(())
  }

  async fn resolve_session(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Profile>> {
    let mut tables = self.tables.write();
    match tables.sessions.get(token).map(|s| (s.expires_at > now, s.user_id)) {
      None => Ok(None),
      Some((false, _)) => {
        tables.sessions.remove(token);
        Ok(None)
      }
      Some((true, user_id)) => Ok(tables.profiles.iter().find(|p| p.id == user_id).cloned()),
    }
  }

  async fn revoke_session(&self, token: &str) -> Result<bool> {
    Ok(self.tables.write().sessions.remove(token).is_some())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Duration;

  fn profile(email: &str) -> Profile {
    Profile {
      id: Uuid::new_v4(),
      email: email.to_string(),
      first_name: "Ana".to_string(),
      last_name: "López".to_string(),
      role: Role::Customer,
      created_at: Utc::now(),
    }
  }

  #[tokio::test]
  async fn duplicate_email_is_a_conflict_regardless_of_case() {
    let store = MemoryStore::new();
    store.create_account(&profile("ana@correo.mx"), "hash").await.unwrap();
    let err = store.create_account(&profile("ANA@correo.mx"), "hash").await.unwrap_err();
    assert!(matches!(err, AppError::Conflict(m) if m == DUPLICATE_EMAIL_MESSAGE));
  }

  #[tokio::test]
  async fn expired_sessions_do_not_resolve() {
    let store = MemoryStore::new();
    let ana = profile("ana@correo.mx");
    store.create_account(&ana, "hash").await.unwrap();

    let now = Utc::now();
    let session = Session {
      token: "tok".to_string(),
      user_id: ana.id,
      created_at: now,
      expires_at: now + Duration::hours(1),
    };
    store.create_session(&session).await.unwrap();

    assert_eq!(store.resolve_session("tok", now).await.unwrap().map(|p| p.id), Some(ana.id));
    assert!(store.revoke_session("tok").await.unwrap());
    assert!(store.resolve_session("tok", now).await.unwrap().is_none());

    store.create_session(&session).await.unwrap();
    assert!(store.resolve_session("tok", now + Duration::hours(2)).await.unwrap().is_none());
    // The expired token was deleted, not just skipped.
    assert!(!store.revoke_session("tok").await.unwrap());
  }

  #[tokio::test]
  async fn new_sessions_sweep_out_expired_ones() {
    let store = MemoryStore::new();
    let ana = profile("ana@correo.mx");
    store.create_account(&ana, "hash").await.unwrap();

    let start = Utc::now();
    let session = |token: &str, created_at: DateTime<Utc>| Session {
      token: token.to_string(),
      user_id: ana.id,
      created_at,
      expires_at: created_at + Duration::hours(1),
    };
    store.create_session(&session("old", start)).await.unwrap();
    store.create_session(&session("recent", start + Duration::minutes(30))).await.unwrap();
    assert_eq!(store.tables.read().sessions.len(), 2);

    store.create_session(&session("new", start + Duration::minutes(61))).await.unwrap();
    let tables = store.tables.read();
    assert_eq!(tables.sessions.len(), 2);
    assert!(!tables.sessions.contains_key("old"));
    assert!(tables.sessions.contains_key("recent") && tables.sessions.contains_key("new"));
  }
}
