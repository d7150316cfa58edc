// apps/storefront/src/db/postgres.rs

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{debug, error, info, instrument};
use uuid::Uuid;

use motogear_core::{Order, OrderItem, OrderStatus, OrderWithItems, Product, Profile, Role};

use super::{
  AccountRepository, Credentials, OrderRepository, ProductRepository, ProfileRepository, Session,
  DUPLICATE_EMAIL_MESSAGE,
};
use crate::errors::{AppError, Result};

const PRODUCT_COLUMNS: &str = "id, name, description, price_cents, original_price_cents, category, image_url, \
   rating, reviews_count, stock, is_active, is_featured, discount_percentage, created_at, updated_at";

const ORDER_COLUMNS: &str =
  "id, user_id, status, total_cents, shipping_name, shipping_email, payment_session_id, created_at";

const PROFILE_COLUMNS: &str = "id, email, first_name, last_name, role, created_at";

/// sqlx-backed repositories over the tables created by `migrations/`.
#[derive(Clone)]
pub struct PgStore {
  pool: PgPool,
}

impl PgStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
  matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

#[async_trait]
impl ProductRepository for PgStore {
  async fn list_active(&self) -> Result<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_active ORDER BY created_at ASC"
    ))
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  async fn list_all(&self) -> Result<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC"
    ))
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  async fn find(&self, id: Uuid) -> Result<Option<Product>> {
    let row = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row)
  }

  async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ANY($1)"))
      .bind(ids)
      .fetch_all(&self.pool)
      .await?;
    Ok(rows)
  }

  #[instrument(name = "pg::insert_product", skip(self, product), fields(product_id = %product.id))]
  async fn insert(&self, product: &Product) -> Result<()> {
    sqlx::query(
      "INSERT INTO products (id, name, description, price_cents, original_price_cents, category, image_url, \
       rating, reviews_count, stock, is_active, is_featured, discount_percentage, created_at, updated_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price_cents)
    .bind(product.original_price_cents)
    .bind(&product.category)
    .bind(&product.image_url)
    .bind(product.rating)
    .bind(product.reviews_count)
    .bind(product.stock)
    .bind(product.is_active)
    .bind(product.is_featured)
    .bind(product.discount_percentage)
    .bind(product.created_at)
    .bind(product.updated_at)
    .execute(&self.pool)
    .await
    .map_err(|e| {
      error!("Failed to insert product {}: {}", product.id, e);
      AppError::Sqlx(e)
    })?;
    Ok(())
  }

  async fn update(&self, product: &Product) -> Result<bool> {
    let result = sqlx::query(
      "UPDATE products SET name = $2, description = $3, price_cents = $4, original_price_cents = $5, \
       category = $6, image_url = $7, rating = $8, reviews_count = $9, stock = $10, is_active = $11, \
       is_featured = $12, discount_percentage = $13, updated_at = $14 WHERE id = $1",
    )
    .bind(product.id)
    .bind(&product.name)
    .bind(&product.description)
    .bind(product.price_cents)
    .bind(product.original_price_cents)
    .bind(&product.category)
    .bind(&product.image_url)
    .bind(product.rating)
    .bind(product.reviews_count)
    .bind(product.stock)
    .bind(product.is_active)
    .bind(product.is_featured)
    .bind(product.discount_percentage)
    .bind(product.updated_at)
    .execute(&self.pool)
    .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn set_active(&self, id: Uuid, is_active: bool, now: DateTime<Utc>) -> Result<bool> {
    let result = sqlx::query("UPDATE products SET is_active = $2, updated_at = $3 WHERE id = $1")
      .bind(id)
      .bind(is_active)
      .bind(now)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn delete(&self, id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
      .bind(id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl OrderRepository for PgStore {
  #[instrument(name = "pg::create_order", skip(self, order, items), fields(order_id = %order.id, lines = items.len()))]
  async fn create(&self, order: &Order, items: &[OrderItem]) -> Result<()> {
    let mut tx = self.pool.begin().await?;

    sqlx::query(
      "INSERT INTO orders (id, user_id, status, total_cents, shipping_name, shipping_email, payment_session_id, created_at) \
       VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(order.id)
    .bind(order.user_id)
    .bind(order.status)
    .bind(order.total_cents)
    .bind(&order.shipping_name)
    .bind(&order.shipping_email)
    .bind(&order.payment_session_id)
    .bind(order.created_at)
    .execute(&mut *tx)
    .await?;

    for item in items {
      sqlx::query(
        "INSERT INTO order_items (id, order_id, product_id, product_name, quantity, unit_price_cents) \
         VALUES ($1, $2, $3, $4, $5, $6)",
      )
      .bind(item.id)
      .bind(item.order_id)
      .bind(item.product_id)
      .bind(&item.product_name)
      .bind(item.quantity)
      .bind(item.unit_price_cents)
      .execute(&mut *tx)
      .await?;
    }

    tx.commit().await?;
    info!("Order persisted.");
    Ok(())
  }

  async fn list_all(&self) -> Result<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders ORDER BY created_at DESC"))
      .fetch_all(&self.pool)
      .await?;
    Ok(rows)
  }

  async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Order>> {
    let rows = sqlx::query_as::<_, Order>(&format!(
      "SELECT {ORDER_COLUMNS} FROM orders WHERE user_id = $1 ORDER BY created_at DESC"
    ))
    .bind(user_id)
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  async fn find_with_items(&self, id: Uuid) -> Result<Option<OrderWithItems>> {
    let Some(order) = sqlx::query_as::<_, Order>(&format!("SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?
    else {
      return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItem>(
      "SELECT id, order_id, product_id, product_name, quantity, unit_price_cents \
       FROM order_items WHERE order_id = $1 ORDER BY product_name ASC",
    )
    .bind(id)
    .fetch_all(&self.pool)
    .await?;

    Ok(Some(OrderWithItems { order, items }))
  }

  async fn set_status(&self, id: Uuid, status: OrderStatus) -> Result<bool> {
    let result = sqlx::query("UPDATE orders SET status = $2 WHERE id = $1")
      .bind(id)
      .bind(status)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[async_trait]
impl ProfileRepository for PgStore {
  async fn list_all(&self) -> Result<Vec<Profile>> {
    let rows = sqlx::query_as::<_, Profile>(&format!(
      "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY created_at DESC"
    ))
    .fetch_all(&self.pool)
    .await?;
    Ok(rows)
  }

  async fn find(&self, id: Uuid) -> Result<Option<Profile>> {
    let row = sqlx::query_as::<_, Profile>(&format!("SELECT {PROFILE_COLUMNS} FROM profiles WHERE id = $1"))
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(row)
  }

  async fn set_role(&self, id: Uuid, role: Role) -> Result<bool> {
    let result = sqlx::query("UPDATE profiles SET role = $2 WHERE id = $1")
      .bind(id)
      .bind(role)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}

#[derive(sqlx::FromRow)]
struct CredentialsRow {
  id: Uuid,
  password_hash: String,
}

#[async_trait]
impl AccountRepository for PgStore {
  #[instrument(name = "pg::create_account", skip(self, profile, password_hash), fields(user_id = %profile.id))]
  async fn create_account(&self, profile: &Profile, password_hash: &str) -> Result<()> {
    let mut tx = self.pool.begin().await?;

    sqlx::query("INSERT INTO auth_users (id, email, password_hash, created_at) VALUES ($1, $2, $3, $4)")
      .bind(profile.id)
      .bind(profile.email.trim().to_lowercase())
      .bind(password_hash)
      .bind(profile.created_at)
      .execute(&mut *tx)
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          AppError::Conflict(DUPLICATE_EMAIL_MESSAGE.to_string())
        } else {
          AppError::Sqlx(e)
        }
      })?;

    sqlx::query(
      "INSERT INTO profiles (id, email, first_name, last_name, role, created_at) VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(profile.id)
    .bind(&profile.email)
    .bind(&profile.first_name)
    .bind(&profile.last_name)
    .bind(profile.role)
    .bind(profile.created_at)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(())
  }

  async fn find_credentials(&self, email: &str) -> Result<Option<Credentials>> {
    let row = sqlx::query_as::<_, CredentialsRow>("SELECT id, password_hash FROM auth_users WHERE email = $1")
      .bind(email.trim().to_lowercase())
      .fetch_optional(&self.pool)
      .await?;
    Ok(row.map(|r| Credentials {
      user_id: r.id,
      password_hash: r.password_hash,
    }))
  }

  #[instrument(name = "pg::create_session", skip(self, session), fields(user_id = %session.user_id))]
  async fn create_session(&self, session: &Session) -> Result<()> {
    let mut tx = self.pool.begin().await?;

    let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
      .bind(session.created_at)
      .execute(&mut *tx)
      .await?
      .rows_affected();
    if purged > 0 {
      debug!(purged, "Expired sessions deleted.");
    }

    sqlx::query("INSERT INTO sessions (token, user_id, created_at, expires_at) VALUES ($1, $2, $3, $4)")
      .bind(&session.token)
      .bind(session.user_id)
      .bind(session.created_at)
      .bind(session.expires_at)
      .execute(&mut *tx)
      .await?;

    tx.commit().await?;
    Ok(())
  }

  async fn resolve_session(&self, token: &str, now: DateTime<Utc>) -> Result<Option<Profile>> {
    sqlx::query("DELETE FROM sessions WHERE token = $1 AND expires_at <= $2")
      .bind(token)
      .bind(now)
      .execute(&self.pool)
      .await?;

    let row = sqlx::query_as::<_, Profile>(
      "SELECT p.id, p.email, p.first_name, p.last_name, p.role, p.created_at \
       FROM sessions s JOIN profiles p ON p.id = s.user_id \
       WHERE s.token = $1 AND s.expires_at > $2",
    )
    .bind(token)
    .bind(now)
    .fetch_optional(&self.pool)
    .await?;
    Ok(row)
  }

  async fn revoke_session(&self, token: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
      .bind(token)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}
