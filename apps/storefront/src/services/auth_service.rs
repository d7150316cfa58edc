// apps/storefront/src/services/auth_service.rs

//! Password hashing, sign-up, sign-in and bearer sessions.

use argon2::{
  password_hash::{rand_core::OsRng as SaltRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
  Argon2,
};
use chrono::{DateTime, Utc};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use motogear_core::models::is_plausible_email;
use motogear_core::{Profile, Role};

use crate::db::{AccountRepository, Session};
use crate::errors::{AppError, Result};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MISSING_FIELDS_MESSAGE: &str = "Todos los campos son obligatorios";
pub const PASSWORD_MISMATCH_MESSAGE: &str = "Las contraseñas no coinciden";
pub const PASSWORD_TOO_SHORT_MESSAGE: &str = "La contraseña debe tener al menos 6 caracteres";
pub const INVALID_EMAIL_MESSAGE: &str = "Correo electrónico inválido";
pub const BAD_CREDENTIALS_MESSAGE: &str = "Correo o contraseña incorrectos";

/// Hashes a plain-text password using Argon2 with a fresh random salt.
#[instrument(name = "auth_service::hash_password", skip(password), err(Display))]
pub fn hash_password(password: &str) -> Result<String> {
  if password.is_empty() {
    error!("Password hashing failed: Password cannot be empty.");
    return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
  }

  let salt = SaltString::generate(&mut SaltRng);
  Argon2::default()
    .hash_password(password.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|argon_err| {
      error!(error = %argon_err, "Argon2 password hashing failed.");
      AppError::Internal(format!("Password hashing process failed: {}", argon_err))
    })
}

/// Verifies a plain-text password against a stored Argon2 hash.
///
/// `Ok(false)` means the password does not match; errors are reserved for
/// unreadable hashes.
#[instrument(name = "auth_service::verify_password", skip(hashed_password_str, provided_password), err(Display), fields(hash_len = hashed_password_str.len()))]
pub fn verify_password(hashed_password_str: &str, provided_password: &str) -> Result<bool> {
  if provided_password.is_empty() {
    return Ok(false);
  }

  let parsed_hash = PasswordHash::new(hashed_password_str).map_err(|parse_err| {
    error!(error = %parse_err, "Failed to parse stored password hash string.");
    AppError::Internal(format!("Invalid stored password hash format: {}", parse_err))
  })?;

  match Argon2::default().verify_password(provided_password.as_bytes(), &parsed_hash) {
    Ok(()) => Ok(true),
    Err(argon2::password_hash::Error::Password) => {
      debug!("Password verification failed: Passwords do not match.");
      Ok(false)
    }
    Err(other_argon_err) => {
      error!(error = %other_argon_err, "Argon2 password verification process encountered an error.");
      Err(AppError::Internal(format!(
        "Password verification process failed: {}",
        other_argon_err
      )))
    }
  }
}

/// Argon2 is CPU-bound; keep it off the async workers.
pub async fn hash_password_blocking(password: String) -> Result<String> {
  tokio::task::spawn_blocking(move || hash_password(&password))
    .await
    .map_err(|join_err| AppError::Internal(format!("Password hashing task failed: {}", join_err)))?
}

pub async fn verify_password_blocking(hash: String, password: String) -> Result<bool> {
  tokio::task::spawn_blocking(move || verify_password(&hash, &password))
    .await
    .map_err(|join_err| AppError::Internal(format!("Password verification task failed: {}", join_err)))?
}

/// 32 random bytes, hex encoded.
pub fn generate_session_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignUpForm {
  pub first_name: String,
  #[serde(default)]
  pub last_name: String,
  pub email: String,
  pub password: String,
  pub confirm_password: String,
}

impl SignUpForm {
  pub fn validate(&self) -> Result<()> {
    if self.first_name.trim().is_empty()
      || self.email.trim().is_empty()
      || self.password.is_empty()
      || self.confirm_password.is_empty()
    {
      return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
    }
    if self.password != self.confirm_password {
      return Err(AppError::Validation(PASSWORD_MISMATCH_MESSAGE.to_string()));
    }
    if self.password.chars().count() < MIN_PASSWORD_LEN {
      return Err(AppError::Validation(PASSWORD_TOO_SHORT_MESSAGE.to_string()));
    }
    if !is_plausible_email(&self.email) {
      return Err(AppError::Validation(INVALID_EMAIL_MESSAGE.to_string()));
    }
    Ok(())
  }
}

/// Token plus who it belongs to, as returned by sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct SignedIn {
  pub token: String,
  pub expires_at: DateTime<Utc>,
  pub profile: Profile,
}

/// Registers a customer account. The role is always `Role::Customer`.
#[instrument(name = "auth_service::sign_up", skip(accounts, form), fields(email = %form.email))]
pub async fn sign_up(accounts: &dyn AccountRepository, form: SignUpForm) -> Result<Profile> {
  form.validate()?;

  let password_hash = hash_password_blocking(form.password).await?;
  let profile = Profile {
    id: Uuid::new_v4(),
    email: form.email.trim().to_lowercase(),
    first_name: form.first_name.trim().to_string(),
    last_name: form.last_name.trim().to_string(),
    role: Role::Customer,
    created_at: Utc::now(),
  };
  accounts.create_account(&profile, &password_hash).await?;

  info!(user_id = %profile.id, "Account created.");
  Ok(profile)
}

/// Checks the credentials and opens a session. Unknown email and wrong
/// password fail identically.
#[instrument(name = "auth_service::sign_in", skip(accounts, email, password, ttl), fields(email = %email))]
pub async fn sign_in(
  accounts: &dyn AccountRepository,
  email: &str,
  password: &str,
  ttl: chrono::Duration,
) -> Result<SignedIn> {
  if email.trim().is_empty() || password.is_empty() {
    return Err(AppError::Validation(MISSING_FIELDS_MESSAGE.to_string()));
  }

  let Some(credentials) = accounts.find_credentials(email).await? else {
    warn!("Sign-in rejected: unknown email.");
    return Err(AppError::Auth(BAD_CREDENTIALS_MESSAGE.to_string()));
  };

  if !verify_password_blocking(credentials.password_hash, password.to_string()).await? {
    warn!(user_id = %credentials.user_id, "Sign-in rejected: wrong password.");
    return Err(AppError::Auth(BAD_CREDENTIALS_MESSAGE.to_string()));
  }

  let now = Utc::now();
  let session = Session {
    token: generate_session_token(),
    user_id: credentials.user_id,
    created_at: now,
    expires_at: now + ttl,
  };
  accounts.create_session(&session).await?;

  let profile = accounts
    .resolve_session(&session.token, now)
    .await?
    .ok_or_else(|| AppError::Internal(format!("Account {} has no profile", credentials.user_id)))?;

  info!(user_id = %profile.id, role = %profile.role, "Signed in.");
  Ok(SignedIn {
    token: session.token,
    expires_at: session.expires_at,
    profile,
  })
}

#[instrument(name = "auth_service::sign_out", skip(accounts, token))]
pub async fn sign_out(accounts: &dyn AccountRepository, token: &str) -> Result<()> {
  if accounts.revoke_session(token).await? {
    info!("Session revoked.");
  } else {
    debug!("Sign-out for an unknown or already revoked session.");
  }
  Ok(())
}
