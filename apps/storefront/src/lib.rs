// apps/storefront/src/lib.rs

//! MotoGear storefront HTTP service.
//!
//! Pricing, cart and catalog rules live in `motogear-core`; this crate wires
//! them to a data backend, a payment gateway and the actix-web routes.

pub mod config;
pub mod db;
pub mod errors;
pub mod services;
pub mod state;
pub mod web;

use std::sync::Arc;

use sqlx::PgPool;
use tracing::{info, instrument};

use crate::config::{AppConfig, DataBackend};
use crate::db::memory::MemoryStore;
use crate::db::postgres::PgStore;
use crate::db::{seed, Backend};
use crate::errors::{AppError, Result};
use crate::services::payment_gateway::{PaymentGateway, StripeGateway};
use crate::services::payment_mock::MockPaymentGateway;
use crate::state::AppState;

/// Connects the configured backend, runs migrations and seeding when asked,
/// and picks the payment gateway.
#[instrument(name = "bootstrap::build_state", skip(config), fields(backend = ?config.data_backend))]
pub async fn build_state(config: Arc<AppConfig>) -> Result<AppState> {
  let backend = match config.data_backend {
    DataBackend::Postgres => {
      let url = config
        .database_url
        .as_deref()
        .ok_or_else(|| AppError::Config("DATABASE_URL must be set for the postgres backend".to_string()))?;
      let pool = PgPool::connect(url).await?;
      info!("Successfully connected to the database.");

      if config.run_migrations {
        sqlx::migrate!("./migrations")
          .run(&pool)
          .await
          .map_err(|e| AppError::Internal(format!("Migration failed: {}", e)))?;
        info!("Database migrations applied.");
      }
      Backend::from_store(Arc::new(PgStore::new(pool)))
    }
    DataBackend::Memory => {
      info!("Using the in-memory store. Data is lost on restart.");
      Backend::from_store(Arc::new(MemoryStore::new()))
    }
  };

  if config.seed_db {
    seed::seed_backend(&backend, config.seed_manager.as_ref()).await?;
  }

  let payments: Arc<dyn PaymentGateway> = match config.stripe_secret_key.as_deref() {
    Some(key) => {
      info!("Payments go through Stripe at {}.", config.stripe_api_base);
      Arc::new(StripeGateway::new(config.stripe_api_base.clone(), key))
    }
    None => {
      info!("No STRIPE_SECRET_KEY set; using the mock payment gateway.");
      Arc::new(MockPaymentGateway::new())
    }
  };

  Ok(AppState::new(backend, payments, config))
}
