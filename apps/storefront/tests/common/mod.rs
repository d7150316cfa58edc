// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::sync::Arc;

use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::{header, StatusCode};
use actix_web::test;
use once_cell::sync::Lazy;
use serde_json::{json, Value};
use tracing::Level;

use motogear_storefront::config::{AppConfig, SeedManager};
use motogear_storefront::db::memory::MemoryStore;
use motogear_storefront::db::{seed, Backend};
use motogear_storefront::services::payment_gateway::PaymentGateway;
use motogear_storefront::services::payment_mock::MockPaymentGateway;
use motogear_storefront::state::AppState;

pub const MANAGER_EMAIL: &str = "gerente@motogear.test";
pub const MANAGER_PASSWORD: &str = "gerente-secreto";

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

/// Seeded in-memory store plus the mock gateway, with a manager account.
pub async fn test_state() -> (AppState, Arc<MockPaymentGateway>) {
  setup_tracing();
  let backend = Backend::from_store(Arc::new(MemoryStore::new()));
  let manager = SeedManager {
    email: MANAGER_EMAIL.to_string(),
    password: MANAGER_PASSWORD.to_string(),
  };
  seed::seed_backend(&backend, Some(&manager))
    .await
    .expect("seeding the memory store");

  let mock = Arc::new(MockPaymentGateway::new());
  let payments: Arc<dyn PaymentGateway> = mock.clone();
  let state = AppState::new(backend, payments, Arc::new(AppConfig::default()));
  (state, mock)
}

/// Calls the service and decodes the body as JSON (`Null` when it is not).
pub async fn send<S, R, B>(app: &S, req: R) -> (StatusCode, Value)
where
  S: Service<R, Response = ServiceResponse<B>, Error = actix_web::Error>,
  B: MessageBody,
{
  let res = test::call_service(app, req).await;
  let status = res.status();
  let body = test::read_body(res).await;
  let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
  (status, json)
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
  (header::AUTHORIZATION, format!("Bearer {}", token))
}

/// Id of the active catalog product with the given name.
pub async fn product_id<S, B>(app: &S, name: &str) -> String
where
  S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
  B: MessageBody,
{
  let (status, body) = send(app, test::TestRequest::get().uri("/api/v1/products").to_request()).await;
  assert_eq!(status, StatusCode::OK);
  body["products"]
    .as_array()
    .expect("products array")
    .iter()
    .find(|p| p["name"] == name)
    .and_then(|p| p["id"].as_str())
    .unwrap_or_else(|| panic!("product {} not in catalog", name))
    .to_string()
}

pub async fn sign_in<S, B>(app: &S, email: &str, password: &str) -> String
where
  S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
  B: MessageBody,
{
  let req = test::TestRequest::post()
    .uri("/api/v1/auth/signin")
    .set_json(json!({ "email": email, "password": password }))
    .to_request();
  let (status, body) = send(app, req).await;
  assert_eq!(status, StatusCode::OK, "signin failed: {}", body);
  body["token"].as_str().expect("token").to_string()
}

/// Registers a customer and returns a session token for them.
pub async fn customer_token<S, B>(app: &S, email: &str) -> String
where
  S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
  B: MessageBody,
{
  let req = test::TestRequest::post()
    .uri("/api/v1/auth/signup")
    .set_json(json!({
        "first_name": "Ana",
        "last_name": "Rider",
        "email": email,
        "password": "rodada123",
        "confirm_password": "rodada123"
    }))
    .to_request();
  let (status, body) = send(app, req).await;
  assert_eq!(status, StatusCode::CREATED, "signup failed: {}", body);
  sign_in(app, email, "rodada123").await
}
