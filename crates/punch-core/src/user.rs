//! User: the identity that signs in and owns registered times.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::role::Role;

/// A registered identity.
///
/// `password_hash` is an argon2 PHC string and is never serialised; clients
/// only ever see the public fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:       Uuid,
  pub name:          String,
  pub email:         String,
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub role:          Role,
  pub created_at:    DateTime<Utc>,
}

/// Input for [`UserStore::create_user`](crate::store::UserStore::create_user).
/// The password must already be hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          Role,
}

/// A partial update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
  pub name:          Option<String>,
  pub email:         Option<String>,
  pub password_hash: Option<String>,
  pub role:          Option<Role>,
}

impl UserPatch {
  pub fn is_empty(&self) -> bool {
    self.name.is_none()
      && self.email.is_none()
      && self.password_hash.is_none()
      && self.role.is_none()
  }
}
