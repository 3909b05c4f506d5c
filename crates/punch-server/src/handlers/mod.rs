pub mod session;
pub mod subscriptions;
pub mod times;
pub mod users;

use punch_core::store::StoreError;

use crate::error::Error;

pub(super) fn store_err<E>(e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  Error::Store(Box::new(e))
}

/// Like [`store_err`], but a uniqueness violation the store caught itself
/// becomes a 409.
pub(super) fn write_err<E: StoreError>(e: E) -> Error {
  if e.is_conflict() {
    return Error::Conflict(e.to_string());
  }
  store_err(e)
}

/// Trim `value`, rejecting it if nothing is left.
pub(super) fn non_empty(field: &str, value: String) -> Result<String, Error> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::BadRequest(format!("{field} must not be empty")));
  }
  Ok(trimmed.to_owned())
}
