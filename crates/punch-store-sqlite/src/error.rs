//! Error type for `punch-store-sqlite`.

use punch_core::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] punch_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("email already registered: {0}")]
  EmailTaken(String),

  /// Attempted to record a time for a user that does not exist.
  #[error("user not found: {0}")]
  UserNotFound(uuid::Uuid),
}

impl StoreError for Error {
  fn is_conflict(&self) -> bool { matches!(self, Error::EmailTaken(_)) }

  fn is_missing_reference(&self) -> bool { matches!(self, Error::UserNotFound(_)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
