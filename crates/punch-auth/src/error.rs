//! Error taxonomy for authentication and authorization.

use punch_core::role::Role;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// No token, an undecodable token, or a token whose subject is gone.
  #[error("authentication required")]
  Unauthenticated,

  /// A valid identity whose role does not meet the requirement.
  #[error("{required} role required")]
  Forbidden { required: Role },

  /// Sign-in failed. Deliberately silent about which half was wrong.
  #[error("invalid email or password")]
  InvalidCredentials,

  /// Decode-level failure; the policy reports it as `Unauthenticated`.
  #[error("invalid token: {0}")]
  InvalidToken(#[from] jsonwebtoken::errors::Error),

  #[error("token encoding failed: {0}")]
  TokenEncoding(#[source] jsonwebtoken::errors::Error),

  /// `now + ttl` falls outside the representable calendar.
  #[error("token lifetime overflows the calendar")]
  LifetimeOverflow,

  #[error("password hashing failed: {0}")]
  Hashing(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
