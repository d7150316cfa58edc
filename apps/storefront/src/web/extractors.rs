// apps/storefront/src/web/extractors.rs

//! Request extractors for the bearer session and the manager role gate.

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use chrono::Utc;
use futures_util::future::LocalBoxFuture;
use tracing::{debug, warn};

use motogear_core::Profile;

use crate::errors::AppError;
use crate::state::AppState;

pub const SIGN_IN_REQUIRED_MESSAGE: &str = "Debes iniciar sesión";
pub const MANAGER_ONLY_MESSAGE: &str = "Acceso restringido a gerentes";

fn bearer_token(req: &HttpRequest) -> Option<String> {
  let value = req.headers().get(header::AUTHORIZATION)?.to_str().ok()?;
  let (scheme, token) = value.trim().split_once(' ')?;
  let token = token.trim();
  if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
    Some(token.to_string())
  } else {
    None
  }
}

fn app_state(req: &HttpRequest) -> Result<web::Data<AppState>, AppError> {
  req
    .app_data::<web::Data<AppState>>()
    .cloned()
    .ok_or_else(|| AppError::Internal("AppState is not registered on the app".to_string()))
}

async fn resolve(state: &AppState, token: String) -> Result<AuthenticatedUser, AppError> {
  match state.accounts.resolve_session(&token, Utc::now()).await? {
    Some(profile) => {
      debug!(user_id = %profile.id, "Session resolved.");
      Ok(AuthenticatedUser { profile, token })
    }
    None => {
      warn!("Rejected unknown or expired session token.");
      Err(AppError::Auth(SIGN_IN_REQUIRED_MESSAGE.to_string()))
    }
  }
}

/// The signed-in caller, taken from `Authorization: Bearer <token>`.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
  pub profile: Profile,
  pub token: String,
}

impl AuthenticatedUser {
  pub fn user_id(&self) -> uuid::Uuid {
    self.profile.id
  }
}

impl FromRequest for AuthenticatedUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = bearer_token(req);
    let state = app_state(req);
    Box::pin(async move {
      let state = state?;
      let token = token.ok_or_else(|| AppError::Auth(SIGN_IN_REQUIRED_MESSAGE.to_string()))?;
      resolve(&state, token).await
    })
  }
}

/// Guest or signed-in. A missing header is a guest; a header with a bad or
/// expired token is still rejected.
#[derive(Debug, Clone)]
pub struct MaybeUser(pub Option<AuthenticatedUser>);

impl FromRequest for MaybeUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let token = bearer_token(req);
    let state = app_state(req);
    Box::pin(async move {
      match token {
        None => Ok(MaybeUser(None)),
        Some(token) => {
          let state = state?;
          Ok(MaybeUser(Some(resolve(&state, token).await?)))
        }
      }
    })
  }
}

/// A signed-in manager. Anyone else is turned away: 401 without a session,
/// 403 with one.
#[derive(Debug, Clone)]
pub struct ManagerUser(pub AuthenticatedUser);

impl FromRequest for ManagerUser {
  type Error = AppError;
  type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
    let user = AuthenticatedUser::from_request(req, payload);
    Box::pin(async move {
      let user = user.await?;
      if user.profile.role.can_administer() {
        Ok(ManagerUser(user))
      } else {
        warn!(user_id = %user.profile.id, role = %user.profile.role, "Admin access denied.");
        Err(AppError::Forbidden(MANAGER_ONLY_MESSAGE.to_string()))
      }
    })
  }
}
