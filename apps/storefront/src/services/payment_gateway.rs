// apps/storefront/src/services/payment_gateway.rs

//! Hosted checkout sessions with the payment gateway.
//!
//! The storefront never handles card data: it asks the gateway for an
//! embedded checkout session and hands the client secret to the browser.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};

use motogear_core::PricedLine;

use crate::errors::{AppError, Result};

pub const SHIPPING_LINE_NAME: &str = "Envío";

/// What the gateway is asked to charge.
#[derive(Debug, Clone)]
pub struct SessionRequest {
  pub currency: String,
  pub lines: Vec<PricedLine>,
  /// Charged as its own line when non-zero.
  pub shipping_cents: i64,
  pub customer_email: Option<String>,
}

impl SessionRequest {
  pub fn amount_cents(&self) -> i64 {
    self
      .lines
      .iter()
      .map(PricedLine::line_total_cents)
      .fold(self.shipping_cents, i64::saturating_add)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSession {
  pub id: String,
  pub client_secret: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  fn name(&self) -> &'static str;

  async fn create_checkout_session(&self, request: &SessionRequest) -> Result<CheckoutSession>;
}

/// Form fields for `POST /v1/checkout/sessions`: an embedded, payment-mode
/// session that never redirects, one `price_data` line per product.
pub fn session_form_params(request: &SessionRequest) -> Vec<(String, String)> {
  let mut params: Vec<(String, String)> = vec![
    ("ui_mode".into(), "embedded".into()),
    ("redirect_on_completion".into(), "never".into()),
    ("mode".into(), "payment".into()),
  ];
  if let Some(email) = &request.customer_email {
    params.push(("customer_email".into(), email.clone()));
  }

  let mut push_line = |index: usize, name: &str, description: &str, unit_amount: i64, quantity: i32| {
    let prefix = format!("line_items[{index}]");
    params.push((format!("{prefix}[price_data][currency]"), request.currency.clone()));
    params.push((format!("{prefix}[price_data][product_data][name]"), name.to_string()));
    if !description.is_empty() {
      params.push((
        format!("{prefix}[price_data][product_data][description]"),
        description.to_string(),
      ));
    }
    params.push((format!("{prefix}[price_data][unit_amount]"), unit_amount.to_string()));
    params.push((format!("{prefix}[quantity]"), quantity.to_string()));
  };

  for (index, line) in request.lines.iter().enumerate() {
    push_line(index, &line.name, &line.description, line.unit_price_cents, line.quantity);
  }
  if request.shipping_cents > 0 {
    push_line(request.lines.len(), SHIPPING_LINE_NAME, "", request.shipping_cents, 1);
  }
  params
}

#[derive(Debug, Deserialize)]
struct StripeSessionResponse {
  id: String,
  client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
  error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
  message: Option<String>,
  #[serde(rename = "type")]
  kind: Option<String>,
}

/// Stripe Checkout Sessions over plain HTTPS.
pub struct StripeGateway {
  client: reqwest::Client,
  api_base: String,
  secret_key: String,
}

impl StripeGateway {
  pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
    Self {
      client: reqwest::Client::new(),
      api_base: api_base.into(),
      secret_key: secret_key.into(),
    }
  }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
  fn name(&self) -> &'static str {
    "stripe"
  }

  #[instrument(name = "stripe::create_checkout_session", skip(self, request), fields(lines = request.lines.len(), amount_cents = request.amount_cents()))]
  async fn create_checkout_session(&self, request: &SessionRequest) -> Result<CheckoutSession> {
    let url = format!("{}/v1/checkout/sessions", self.api_base);
    let resp = self
      .client
      .post(&url)
      .header("Authorization", format!("Bearer {}", self.secret_key))
      .header("Accept", "application/json")
      .form(&session_form_params(request))
      .send()
      .await?;

    let status = resp.status();
    if !status.is_success() {
      let body = resp.text().await.unwrap_or_default();
      let detail = serde_json::from_str::<StripeErrorBody>(&body)
        .map(|b| {
          format!(
            "{}: {}",
            b.error.kind.unwrap_or_else(|| "unknown".to_string()),
            b.error.message.unwrap_or_default()
          )
        })
        .unwrap_or(body);
      error!(status = status.as_u16(), %detail, "Stripe rejected the checkout session.");
      return Err(AppError::Payment(format!("Stripe returned {}: {}", status, detail)));
    }

    let session: StripeSessionResponse = resp.json().await?;
    let client_secret = session.client_secret.ok_or_else(|| {
      AppError::Payment(format!("Stripe session {} came back without a client secret", session.id))
    })?;

    info!(session_id = %session.id, "Stripe checkout session created.");
    Ok(CheckoutSession {
      id: session.id,
      client_secret,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use uuid::Uuid;

  fn line(name: &str, unit: i64, quantity: i32) -> PricedLine {
    PricedLine {
      product_id: Uuid::new_v4(),
      name: name.to_string(),
      description: format!("{name} desc"),
      image_url: String::new(),
      unit_price_cents: unit,
      quantity,
    }
  }

  fn value<'a>(params: &'a [(String, String)], key: &str) -> Option<&'a str> {
    params.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
  }

  #[test]
  fn form_describes_an_embedded_payment_session() {
    let request = SessionRequest {
      currency: "mxn".into(),
      lines: vec![line("Casco Pro Carbon", 429_900, 2), line("Guantes Racing Pro", 129_900, 1)],
      shipping_cents: 0,
      customer_email: None,
    };
    let params = session_form_params(&request);

    assert_eq!(value(&params, "ui_mode"), Some("embedded"));
    assert_eq!(value(&params, "redirect_on_completion"), Some("never"));
    assert_eq!(value(&params, "mode"), Some("payment"));
    assert_eq!(value(&params, "line_items[0][price_data][currency]"), Some("mxn"));
    assert_eq!(value(&params, "line_items[0][price_data][unit_amount]"), Some("429900"));
    assert_eq!(value(&params, "line_items[0][quantity]"), Some("2"));
    assert_eq!(
      value(&params, "line_items[1][price_data][product_data][name]"),
      Some("Guantes Racing Pro")
    );
    assert_eq!(value(&params, "line_items[2][quantity]"), None);
    assert_eq!(request.amount_cents(), 989_700);
  }

  #[test]
  fn shipping_becomes_its_own_line() {
    let request = SessionRequest {
      currency: "mxn".into(),
      lines: vec![line("Soporte Movil Pro", 89_900, 1)],
      shipping_cents: 19_900,
      customer_email: Some("ana@correo.mx".into()),
    };
    let params = session_form_params(&request);

    assert_eq!(value(&params, "line_items[1][price_data][product_data][name]"), Some(SHIPPING_LINE_NAME));
    assert_eq!(value(&params, "line_items[1][price_data][unit_amount]"), Some("19900"));
    assert_eq!(value(&params, "line_items[1][price_data][product_data][description]"), None);
    assert_eq!(value(&params, "customer_email"), Some("ana@correo.mx"));
    assert_eq!(request.amount_cents(), 109_800);
  }
}
