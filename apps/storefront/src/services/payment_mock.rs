// apps/storefront/src/services/payment_mock.rs

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{info, instrument};
use uuid::Uuid;

use super::payment_gateway::{CheckoutSession, PaymentGateway, SessionRequest};
use crate::errors::{AppError, Result};

/// A session the mock handed out, with the request that produced it.
#[derive(Debug, Clone)]
pub struct RecordedSession {
  pub session: CheckoutSession,
  pub request: SessionRequest,
}

pub const DEFAULT_SESSION_WINDOW: usize = 100;

/// Stands in for the gateway when no secret key is configured. The most
/// recent sessions are kept, oldest first, so tests can inspect exactly what
/// would have been charged.
pub struct MockPaymentGateway {
  sessions: Mutex<VecDeque<RecordedSession>>,
  window: usize,
}

impl Default for MockPaymentGateway {
  fn default() -> Self {
    Self::with_window(DEFAULT_SESSION_WINDOW)
  }
}

impl MockPaymentGateway {
  pub fn new() -> Self {
    Self::default()
  }

  /// Keeps at most `window` sessions.
  pub fn with_window(window: usize) -> Self {
    Self { sessions: Mutex::new(VecDeque::with_capacity(window)), window }
  }

  pub fn sessions(&self) -> Vec<RecordedSession> {
    self.sessions.lock().iter().cloned().collect()
  }

  pub fn last_session(&self) -> Option<RecordedSession> {
    self.sessions.lock().back().cloned()
  }

  fn record(&self, recorded: RecordedSession) {
    if self.window == 0 {
      return;
    }
    let mut sessions = self.sessions.lock();
    while sessions.len() >= self.window {
      sessions.pop_front();
    }
    sessions.push_back(recorded);
  }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
  fn name(&self) -> &'static str {
    "mock"
  }

  #[instrument(name = "payment_mock::create_checkout_session", skip(self, request), fields(amount_cents = request.amount_cents(), currency = %request.currency))]
  async fn create_checkout_session(&self, request: &SessionRequest) -> Result<CheckoutSession> {
    if request.amount_cents() <= 0 {
      return Err(AppError::Payment("Amount must be greater than zero".to_string()));
    }

    let session_id = format!("mock_cs_{}", Uuid::new_v4().simple());
    let session = CheckoutSession {
      client_secret: format!("{}_secret_{}", session_id, Uuid::new_v4().simple()),
      id: session_id,
    };
    self.record(RecordedSession {
      session: session.clone(),
      request: request.clone(),
    });

    info!(session_id = %session.id, "Simulated checkout session created.");
    Ok(session)
  }
}
