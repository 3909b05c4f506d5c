//! In-memory [`UserStore`] for exercising the auth layer in isolation.

use std::{
  collections::HashMap,
  convert::Infallible,
  sync::Mutex,
};

use chrono::Utc;
use punch_core::{
  role::Role,
  store::UserStore,
  user::{NewUser, User, UserPatch},
};
use uuid::Uuid;

use crate::password::hash_password;

#[derive(Default)]
pub struct MemoryUsers {
  users: Mutex<HashMap<Uuid, User>>,
}

impl MemoryUsers {
  /// Insert a user with the given role and password, returning it.
  pub fn seed(&self, email: &str, password: &str, role: Role) -> User {
    let user = User {
      user_id:       Uuid::new_v4(),
      name:          email.split('@').next().unwrap_or(email).to_owned(),
      email:         email.to_owned(),
      password_hash: hash_password(password).unwrap(),
      role,
      created_at:    Utc::now(),
    };
    self.users.lock().unwrap().insert(user.user_id, user.clone());
    user
  }

  pub fn remove(&self, id: Uuid) { self.users.lock().unwrap().remove(&id); }

  pub fn set_role(&self, id: Uuid, role: Role) {
    if let Some(user) = self.users.lock().unwrap().get_mut(&id) {
      user.role = role;
    }
  }
}

impl UserStore for MemoryUsers {
  type Error = Infallible;

  async fn create_user(&self, input: NewUser) -> Result<User, Self::Error> {
    let user = User {
      user_id:       Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      password_hash: input.password_hash,
      role:          input.role,
      created_at:    Utc::now(),
    };
    self.users.lock().unwrap().insert(user.user_id, user.clone());
    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>, Self::Error> {
    Ok(self.users.lock().unwrap().get(&id).cloned())
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, Self::Error> {
    Ok(self.users.lock().unwrap().values().find(|u| u.email == email).cloned())
  }

  async fn list_users(&self) -> Result<Vec<User>, Self::Error> {
    Ok(self.users.lock().unwrap().values().cloned().collect())
  }

  async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>, Self::Error> {
    let mut users = self.users.lock().unwrap();
    let Some(user) = users.get_mut(&id) else { return Ok(None) };
    if let Some(name) = patch.name { user.name = name; }
    if let Some(email) = patch.email { user.email = email; }
    if let Some(hash) = patch.password_hash { user.password_hash = hash; }
    if let Some(role) = patch.role { user.role = role; }
    Ok(Some(user.clone()))
  }

  async fn delete_user(&self, id: Uuid) -> Result<bool, Self::Error> {
    Ok(self.users.lock().unwrap().remove(&id).is_some())
  }
}
