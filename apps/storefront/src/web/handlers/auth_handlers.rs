// apps/storefront/src/web/handlers/auth_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::errors::AppError;
use crate::services::auth_service::{self, SignUpForm};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedUser;

#[derive(Deserialize, Debug)]
pub struct SigninRequestPayload {
  pub email: String,
  pub password: String,
}

#[instrument(
    name = "handler::signup",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signup_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SignUpForm>,
) -> Result<HttpResponse, AppError> {
  let profile = auth_service::sign_up(app_state.accounts.as_ref(), req_payload.into_inner()).await?;

  info!("Signup successful. User ID: {}", profile.id);
  Ok(HttpResponse::Created().json(json!({
      "message": "Cuenta creada correctamente.",
      "profile": profile,
  })))
}

#[instrument(
    name = "handler::signin",
    skip(app_state, req_payload),
    fields(req_email = %req_payload.email)
)]
pub async fn signin_handler(
  app_state: web::Data<AppState>,
  req_payload: web::Json<SigninRequestPayload>,
) -> Result<HttpResponse, AppError> {
  let signed_in = auth_service::sign_in(
    app_state.accounts.as_ref(),
    &req_payload.email,
    &req_payload.password,
    app_state.config.session_ttl(),
  )
  .await?;

  info!("Signin successful. User ID: {}", signed_in.profile.id);
  Ok(HttpResponse::Ok().json(json!({
      "message": "Sesión iniciada.",
      "token": signed_in.token,
      "expires_at": signed_in.expires_at,
      "role": signed_in.profile.role,
      "profile": signed_in.profile,
  })))
}

#[instrument(name = "handler::signout", skip(app_state, auth_user), fields(user_id = %auth_user.user_id()))]
pub async fn signout_handler(
  app_state: web::Data<AppState>,
  auth_user: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
  auth_service::sign_out(app_state.accounts.as_ref(), &auth_user.token).await?;
  Ok(HttpResponse::Ok().json(json!({ "message": "Sesión cerrada." })))
}

#[instrument(name = "handler::me", skip(auth_user), fields(user_id = %auth_user.user_id()))]
pub async fn me_handler(auth_user: AuthenticatedUser) -> Result<HttpResponse, AppError> {
  Ok(HttpResponse::Ok().json(json!({
      "message": "Perfil obtenido.",
      "role": auth_user.profile.role,
      "is_manager": auth_user.profile.role.can_administer(),
      "profile": auth_user.profile,
  })))
}
