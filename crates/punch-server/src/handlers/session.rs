//! `POST /signin`: exchange email + password for a bearer token.

use axum::{Json, extract::State};
use punch_auth::signin::{self, SignIn};
use punch_core::store::TimeStore;
use serde::Deserialize;

use crate::{AppState, error::Error};

#[derive(Debug, Deserialize)]
pub struct SignInBody {
  pub email:    String,
  pub password: String,
}

/// `POST /signin` with body `{"email":"…","password":"…"}`; returns
/// `{"token":"…","user":{…}}`.
pub async fn sign_in<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SignInBody>,
) -> Result<Json<SignIn>, Error>
where
  S: TimeStore + Clone + 'static,
{
  let signed = signin::sign_in(
    state.store.as_ref(),
    &state.tokens,
    body.email.trim(),
    &body.password,
  )
  .await?;
  Ok(Json(signed))
}
