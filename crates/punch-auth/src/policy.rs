//! The access policy evaluated before every protected operation.
//!
//! For a requirement of `Role(r)` the steps run strictly in order:
//!
//! 1. extract the bearer token from the `Authorization` header,
//! 2. verify it with the [`TokenService`],
//! 3. load the subject's current role from the [`UserStore`],
//! 4. compare that role to `r`.
//!
//! Failures in 1–3 are [`Error::Unauthenticated`]; a mismatch in 4 is
//! [`Error::Forbidden`]. Operations without a requirement skip all four.

use std::sync::Arc;

use punch_core::{access::AccessRequirement, store::UserStore, user::User};

use crate::{Error, Result, token::TokenService};

/// Who is calling, as far as the policy established.
#[derive(Debug, Clone)]
pub enum Caller {
  /// The operation had no requirement, so credentials were not inspected.
  Anonymous,
  /// A verified identity that met the operation's requirement.
  User(User),
}

impl Caller {
  pub fn user(&self) -> Option<&User> {
    match self {
      Caller::Anonymous => None,
      Caller::User(user) => Some(user),
    }
  }
}

/// Extract the token from an `Authorization: Bearer <token>` value.
/// The scheme is matched case-insensitively.
pub fn bearer_token(header: &str) -> Option<&str> {
  let (scheme, token) = header.trim().split_once(' ')?;
  let token = token.trim();
  (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

/// Shared, read-only evaluator. Cloning is cheap.
pub struct AccessPolicy<S> {
  store:  Arc<S>,
  tokens: Arc<TokenService>,
}

impl<S> Clone for AccessPolicy<S> {
  fn clone(&self) -> Self {
    Self { store: Arc::clone(&self.store), tokens: Arc::clone(&self.tokens) }
  }
}

impl<S: UserStore> AccessPolicy<S> {
  pub fn new(store: Arc<S>, tokens: Arc<TokenService>) -> Self { Self { store, tokens } }

  /// Decide whether a request carrying `authorization` may run an operation
  /// declaring `requirement`.
  pub async fn authorize(
    &self,
    requirement:   AccessRequirement,
    authorization: Option<&str>,
  ) -> Result<Caller> {
    let AccessRequirement::Role(required) = requirement else {
      return Ok(Caller::Anonymous);
    };

    let token = authorization
      .and_then(bearer_token)
      .ok_or(Error::Unauthenticated)?;

    let claims = self.tokens.decode(token).map_err(|e| {
      tracing::debug!(error = %e, "rejecting undecodable token");
      Error::Unauthenticated
    })?;

    let user = self
      .store
      .get_user(claims.sub)
      .await
      .map_err(|e| Error::Store(Box::new(e)))?
      .ok_or_else(|| {
        tracing::debug!(subject = %claims.sub, "token subject no longer exists");
        Error::Unauthenticated
      })?;

    if !requirement.is_satisfied_by(user.role) {
      tracing::debug!(user = %user.user_id, role = %user.role, %required, "role mismatch");
      return Err(Error::Forbidden { required });
    }

    Ok(Caller::User(user))
  }
}
