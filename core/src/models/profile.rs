// core/src/models/profile.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(type_name = "user_role"))]
pub enum Role {
  #[default]
  #[serde(rename = "cliente")]
  #[cfg_attr(feature = "sqlx", sqlx(rename = "cliente"))]
  Customer,
  #[serde(rename = "empleado")]
  #[cfg_attr(feature = "sqlx", sqlx(rename = "empleado"))]
  Employee,
  #[serde(rename = "gerente")]
  #[cfg_attr(feature = "sqlx", sqlx(rename = "gerente"))]
  Manager,
}

impl Role {
  pub const ALL: [Role; 3] = [Role::Customer, Role::Employee, Role::Manager];

  pub fn as_str(&self) -> &'static str {
    match self {
      Role::Customer => "cliente",
      Role::Employee => "empleado",
      Role::Manager => "gerente",
    }
  }

  /// Employees and managers.
  pub fn is_staff(&self) -> bool {
    !matches!(self, Role::Customer)
  }

  pub fn can_administer(&self) -> bool {
    matches!(self, Role::Manager)
  }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for Role {
  type Err = CoreError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "cliente" | "customer" => Ok(Role::Customer),
      "empleado" | "employee" => Ok(Role::Employee),
      "gerente" | "manager" => Ok(Role::Manager),
      other => Err(CoreError::UnknownRole(other.to_string())),
    }
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Profile {
  pub id: Uuid,
  pub email: String,
  pub first_name: String,
  pub last_name: String,
  pub role: Role,
  pub created_at: DateTime<Utc>,
}
