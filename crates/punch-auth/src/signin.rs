//! Email + password sign-in.

use std::sync::LazyLock;

use punch_core::{store::UserStore, user::User};
use serde::Serialize;

use crate::{
  Error, Result,
  password::{hash_password, spawn_verify, verify_password},
  token::TokenService,
};

/// Verified against when the email is unknown, so a miss costs the same as a
/// wrong password.
static DECOY_HASH: LazyLock<Option<String>> =
  LazyLock::new(|| hash_password("punch-decoy-password").ok());

/// Result of a successful sign-in.
#[derive(Debug, Clone, Serialize)]
pub struct SignIn {
  pub token: String,
  pub user:  User,
}

/// Look up `email`, verify `password` against the stored hash, and issue a
/// token on success. Unknown emails and wrong passwords are indistinguishable
/// to the caller: both are [`Error::InvalidCredentials`].
pub async fn sign_in<S: UserStore>(
  store:    &S,
  tokens:   &TokenService,
  email:    &str,
  password: &str,
) -> Result<SignIn> {
  let user = store
    .find_user_by_email(email)
    .await
    .map_err(|e| Error::Store(Box::new(e)))?;

  let Some(user) = user else {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || {
      if let Some(decoy) = DECOY_HASH.as_deref() {
        verify_password(&password, decoy);
      }
    })
    .await
    .ok();
    return Err(Error::InvalidCredentials);
  };

  if !spawn_verify(password.to_owned(), user.password_hash.clone()).await {
    tracing::debug!(user = %user.user_id, "wrong password");
    return Err(Error::InvalidCredentials);
  }

  let token = tokens.issue(user.user_id)?;
  tracing::info!(user = %user.user_id, "signed in");
  Ok(SignIn { token, user })
}
