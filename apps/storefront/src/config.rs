// apps/storefront/src/config.rs

use std::env;
use std::fmt;
use std::str::FromStr;

use dotenvy::dotenv;
use motogear_core::ShippingPolicy;

use crate::errors::{AppError, Result};

/// Where products, orders, profiles and sessions live.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataBackend {
  Postgres,
  /// Process-local store, seeded on start. Data is lost on restart.
  Memory,
}

impl FromStr for DataBackend {
  type Err = AppError;

  fn from_str(s: &str) -> Result<Self> {
    match s.trim().to_lowercase().as_str() {
      "postgres" | "postgresql" => Ok(DataBackend::Postgres),
      "memory" => Ok(DataBackend::Memory),
      other => Err(AppError::Config(format!("expected 'postgres' or 'memory', got '{}'", other))),
    }
  }
}

#[derive(Clone, PartialEq, Eq)]
pub struct SeedManager {
  pub email: String,
  pub password: String,
}

impl fmt::Debug for SeedManager {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("SeedManager")
      .field("email", &self.email)
      .field("password", &"[REDACTED]")
      .finish()
  }
}

#[derive(Clone)]
pub struct AppConfig {
  pub server_host: String,
  pub server_port: u16,
  pub data_backend: DataBackend,
  pub database_url: Option<String>,
  pub run_migrations: bool,
  pub seed_db: bool,
  pub seed_manager: Option<SeedManager>,

  // Payment gateway. No secret key means the mock gateway is used.
  pub stripe_secret_key: Option<String>,
  pub stripe_api_base: String,
  pub currency: String,

  pub shipping: ShippingPolicy,
  pub session_ttl_hours: i64,
  /// Carts untouched for this long are dropped.
  pub cart_idle_ttl_hours: i64,
}

impl fmt::Debug for AppConfig {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("AppConfig")
      .field("server_host", &self.server_host)
      .field("server_port", &self.server_port)
      .field("data_backend", &self.data_backend)
      .field("database_url", &self.database_url.as_ref().map(|_| "[REDACTED]"))
      .field("run_migrations", &self.run_migrations)
      .field("seed_db", &self.seed_db)
      .field("seed_manager", &self.seed_manager)
      .field("stripe_secret_key", &self.stripe_secret_key.as_ref().map(|_| "[REDACTED]"))
      .field("stripe_api_base", &self.stripe_api_base)
      .field("currency", &self.currency)
      .field("shipping", &self.shipping)
      .field("session_ttl_hours", &self.session_ttl_hours)
      .field("cart_idle_ttl_hours", &self.cart_idle_ttl_hours)
      .finish()
  }
}

impl Default for AppConfig {
  /// In-memory backend with the mock gateway.
  fn default() -> Self {
    Self {
      server_host: "127.0.0.1".to_string(),
      server_port: 8080,
      data_backend: DataBackend::Memory,
      database_url: None,
      run_migrations: false,
      seed_db: true,
      seed_manager: None,
      stripe_secret_key: None,
      stripe_api_base: "https://api.stripe.com".to_string(),
      currency: "mxn".to_string(),
      shipping: ShippingPolicy::default(),
      session_ttl_hours: 168,
      cart_idle_ttl_hours: 24,
    }
  }
}

fn parse_var<T>(name: &str, raw: Option<String>, default: T) -> Result<T>
where
  T: FromStr,
  T::Err: fmt::Display,
{
  match raw {
    None => Ok(default),
    Some(value) => value
      .trim()
      .parse::<T>()
      .map_err(|e| AppError::Config(format!("Invalid {} value '{}': {}", name, value, e))),
  }
}

fn env_value(var_name: &str) -> Option<String> {
  env::var(var_name).ok().filter(|v| !v.trim().is_empty())
}

/// `LOG_JSON` (default `false`). Read apart from [`AppConfig::from_env`]
/// because tracing is set up before the rest of the configuration loads.
pub fn log_json_from_env() -> Result<bool> {
  dotenv().ok();
  parse_var("LOG_JSON", env_value("LOG_JSON"), false)
}

impl AppConfig {
  pub fn from_env() -> Result<Self> {
    dotenv().ok(); // Load .env file if present

    let get_env = env_value;

    let defaults = Self::default();

    let server_host = get_env("SERVER_HOST").unwrap_or(defaults.server_host);
    let server_port = parse_var("SERVER_PORT", get_env("SERVER_PORT"), defaults.server_port)?;
    let data_backend = parse_var("DATA_BACKEND", get_env("DATA_BACKEND"), DataBackend::Postgres)?;

    let database_url = get_env("DATABASE_URL");
    if data_backend == DataBackend::Postgres && database_url.is_none() {
      return Err(AppError::Config(
        "Missing environment variable 'DATABASE_URL' (required when DATA_BACKEND=postgres)".to_string(),
      ));
    }

    let run_migrations = parse_var("RUN_MIGRATIONS", get_env("RUN_MIGRATIONS"), false)?;
    let seed_db = parse_var("SEED_DB", get_env("SEED_DB"), data_backend == DataBackend::Memory)?;
    let seed_manager = match (get_env("SEED_MANAGER_EMAIL"), get_env("SEED_MANAGER_PASSWORD")) {
      (Some(email), Some(password)) => Some(SeedManager { email, password }),
      (None, None) => None,
      _ => {
        return Err(AppError::Config(
          "SEED_MANAGER_EMAIL and SEED_MANAGER_PASSWORD must be set together".to_string(),
        ))
      }
    };

    let stripe_secret_key = get_env("STRIPE_SECRET_KEY");
    let stripe_api_base = get_env("STRIPE_API_BASE")
      .map(|base| base.trim_end_matches('/').to_string())
      .unwrap_or(defaults.stripe_api_base);
    let currency = get_env("CURRENCY").map(|c| c.to_lowercase()).unwrap_or(defaults.currency);

    let shipping = ShippingPolicy {
      free_threshold_cents: parse_var(
        "FREE_SHIPPING_THRESHOLD_CENTS",
        get_env("FREE_SHIPPING_THRESHOLD_CENTS"),
        defaults.shipping.free_threshold_cents,
      )?,
      fee_cents: parse_var("SHIPPING_FEE_CENTS", get_env("SHIPPING_FEE_CENTS"), defaults.shipping.fee_cents)?,
    };
    if shipping.free_threshold_cents < 0 || shipping.fee_cents < 0 {
      return Err(AppError::Config("Shipping amounts cannot be negative".to_string()));
    }

    let session_ttl_hours = parse_var("SESSION_TTL_HOURS", get_env("SESSION_TTL_HOURS"), defaults.session_ttl_hours)?;
    if session_ttl_hours <= 0 {
      return Err(AppError::Config("SESSION_TTL_HOURS must be positive".to_string()));
    }
    let cart_idle_ttl_hours =
      parse_var("CART_IDLE_TTL_HOURS", get_env("CART_IDLE_TTL_HOURS"), defaults.cart_idle_ttl_hours)?;
    if cart_idle_ttl_hours <= 0 {
      return Err(AppError::Config("CART_IDLE_TTL_HOURS must be positive".to_string()));
    }

    let config = Self {
      server_host,
      server_port,
      data_backend,
      database_url,
      run_migrations,
      seed_db,
      seed_manager,
      stripe_secret_key,
      stripe_api_base,
      currency,
      shipping,
      session_ttl_hours,
      cart_idle_ttl_hours,
    };
    tracing::info!(config = ?config, "Application configuration loaded successfully.");
    Ok(config)
  }

  pub fn bind_address(&self) -> String {
    format!("{}:{}", self.server_host, self.server_port)
  }

  pub fn session_ttl(&self) -> chrono::Duration {
    chrono::Duration::hours(self.session_ttl_hours)
  }

  pub fn cart_idle_ttl(&self) -> chrono::Duration {
    chrono::Duration::hours(self.cart_idle_ttl_hours)
  }
}
