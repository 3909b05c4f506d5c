//! Handlers for `/registered-times` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/registered-times` | Every entry with its owner |
//! | `POST`   | `/registered-times` | Body: `{"time_registered":"<RFC 3339>"}`; owner is the caller |
//! | `PATCH`  | `/registered-times/{id}` | Body: `{"time_registered":"<RFC 3339>"}`; 404 if not found |
//! | `DELETE` | `/registered-times/{id}` | 404 if not found |

use std::collections::HashMap;

use axum::{
  Extension, Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use punch_auth::Caller;
use punch_core::{
  store::{StoreError as _, TimeStore, UserStore},
  time::RegisteredTime,
  user::User,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::store_err;
use crate::{AppState, error::Error};

/// A registered time together with its owner.
#[derive(Debug, Serialize)]
pub struct TimeView {
  #[serde(flatten)]
  pub time: RegisteredTime,
  pub user: User,
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /registered-times`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<TimeView>>, Error>
where
  S: TimeStore + Clone + 'static,
{
  let times = state.store.list_times().await.map_err(store_err)?;
  let users: HashMap<Uuid, User> = state
    .store
    .list_users()
    .await
    .map_err(store_err)?
    .into_iter()
    .map(|u| (u.user_id, u))
    .collect();

  let views = times
    .into_iter()
    .filter_map(|time| {
      let user = users.get(&time.user_id)?.clone();
      Some(TimeView { time, user })
    })
    .collect();
  Ok(Json(views))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub time_registered: DateTime<Utc>,
}

/// `POST /registered-times`: recorded for the authenticated caller.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Extension(caller): Extension<Caller>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, Error>
where
  S: TimeStore + Clone + 'static,
{
  let Caller::User(owner) = caller else {
    return Err(punch_auth::Error::Unauthenticated.into());
  };

  let time = state
    .store
    .record_time(owner.user_id, body.time_registered)
    .await
    .map_err(|e| {
      if e.is_missing_reference() {
        // Deleted after the policy admitted them.
        tracing::debug!(user = %owner.user_id, "caller vanished before recording");
        Error::Auth(punch_auth::Error::Unauthenticated)
      } else {
        store_err(e)
      }
    })?;
  tracing::debug!(entry = %time.entry_id, user = %owner.user_id, "time registered");

  Ok((StatusCode::CREATED, Json(TimeView { time, user: owner })))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBody {
  pub time_registered: Option<DateTime<Utc>>,
}

/// `PATCH /registered-times/{id}`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<RegisteredTime>, Error>
where
  S: TimeStore + Clone + 'static,
{
  let time = match body.time_registered {
    Some(at) => state.store.update_time(id, at).await,
    None => state.store.get_time(id).await,
  }
  .map_err(store_err)?
  .ok_or_else(|| Error::NotFound(format!("registered time {id} not found")))?;

  Ok(Json(time))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /registered-times/{id}`: returns `true`.
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<bool>, Error>
where
  S: TimeStore + Clone + 'static,
{
  if !state.store.delete_time(id).await.map_err(store_err)? {
    return Err(Error::NotFound(format!("registered time {id} not found")));
  }
  Ok(Json(true))
}
