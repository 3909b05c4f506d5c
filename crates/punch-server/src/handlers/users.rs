//! Handlers for `/users` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users` | Every user with their registered times |
//! | `POST`   | `/users` | Body: [`CreateBody`]; publishes `created_user` |
//! | `PATCH`  | `/users/{id}` | Body: [`UpdateBody`]; 404 if not found |
//! | `DELETE` | `/users/{id}` | Also deletes the user's times; 404 if not found |

use std::collections::HashMap;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use punch_auth::password::spawn_hash;
use punch_core::{
  role::Role,
  store::{TimeStore, UserStore},
  time::RegisteredTime,
  user::{NewUser, User, UserPatch},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{non_empty, store_err, write_err};
use crate::{AppState, bus, error::Error};

/// A user together with the times they registered.
#[derive(Debug, Serialize)]
pub struct UserView {
  #[serde(flatten)]
  pub user:             User,
  pub registered_times: Vec<RegisteredTime>,
}

async fn ensure_email_free<S: UserStore>(
  store: &S,
  email: &str,
  owner: Option<Uuid>,
) -> Result<(), Error> {
  match store.find_user_by_email(email).await.map_err(store_err)? {
    Some(existing) if Some(existing.user_id) != owner => {
      Err(Error::Conflict(format!("email {email} is already registered")))
    }
    _ => Ok(()),
  }
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<UserView>>, Error>
where
  S: TimeStore + Clone + 'static,
{
  let users = state.store.list_users().await.map_err(store_err)?;
  let times = state.store.list_times().await.map_err(store_err)?;

  let mut by_owner: HashMap<Uuid, Vec<RegisteredTime>> = HashMap::new();
  for time in times {
    by_owner.entry(time.user_id).or_default().push(time);
  }

  let views = users
    .into_iter()
    .map(|user| {
      let registered_times = by_owner.remove(&user.user_id).unwrap_or_default();
      UserView { user, registered_times }
    })
    .collect();
  Ok(Json(views))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:     String,
  pub email:    String,
  pub password: String,
  pub role:     Role,
}

/// `POST /users` with body `{"name":"…","email":"…","password":"…","role":"WORKER"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, Error>
where
  S: TimeStore + Clone + 'static,
{
  let name  = non_empty("name", body.name)?;
  let email = non_empty("email", body.email)?;
  if body.password.is_empty() {
    return Err(Error::BadRequest("password must not be empty".to_string()));
  }

  ensure_email_free(state.store.as_ref(), &email, None).await?;

  let user = state
    .store
    .create_user(NewUser {
      name,
      email,
      password_hash: spawn_hash(body.password).await?,
      role: body.role,
    })
    .await
    .map_err(write_err)?;
  tracing::info!(user = %user.user_id, role = %user.role, "user created");

  let view = UserView { user, registered_times: Vec::new() };
  match serde_json::to_value(&view) {
    Ok(payload) => {
      let reached = state.events.publish(bus::CREATED_USER, payload).await;
      tracing::debug!(reached, "published created_user");
    }
    Err(e) => tracing::warn!(error = %e, "could not encode created_user event"),
  }

  Ok((StatusCode::CREATED, Json(view)))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// Every field is optional; a new password is re-hashed before storage.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub name:     Option<String>,
  pub email:    Option<String>,
  pub password: Option<String>,
  pub role:     Option<Role>,
}

/// `PATCH /users/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<UserView>, Error>
where
  S: TimeStore + Clone + 'static,
{
  let name  = body.name.map(|n| non_empty("name", n)).transpose()?;
  let email = body.email.map(|e| non_empty("email", e)).transpose()?;
  if let Some(email) = &email {
    ensure_email_free(state.store.as_ref(), email, Some(id)).await?;
  }
  if body.password.as_deref() == Some("") {
    return Err(Error::BadRequest("password must not be empty".to_string()));
  }
  let password_hash = match body.password {
    Some(password) => Some(spawn_hash(password).await?),
    None => None,
  };

  let patch = UserPatch { name, email, password_hash, role: body.role };
  let user = state
    .store
    .update_user(id, patch)
    .await
    .map_err(write_err)?
    .ok_or_else(|| Error::NotFound(format!("user {id} not found")))?;

  let registered_times = state.store.list_times_for_user(id).await.map_err(store_err)?;
  Ok(Json(UserView { user, registered_times }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /users/{id}`: returns `true`.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<bool>, Error>
where
  S: TimeStore + Clone + 'static,
{
  if !state.store.delete_user(id).await.map_err(store_err)? {
    return Err(Error::NotFound(format!("user {id} not found")));
  }
  tracing::info!(user = %id, "user deleted");
  Ok(Json(true))
}
