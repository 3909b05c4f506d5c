//! Store traits for users and registered times.
//!
//! Implemented by storage backends (e.g. `punch-store-sqlite`). The auth
//! layer only needs [`UserStore::get_user`] and
//! [`UserStore::find_user_by_email`]; the server depends on the full
//! [`TimeStore`].

use std::{convert::Infallible, future::Future};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{
  time::RegisteredTime,
  user::{NewUser, User, UserPatch},
};

/// Store failures callers need to tell apart from plain I/O errors. Checks
/// made before a write can race with another writer, so the backend's own
/// constraints report through these.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
  /// A write collided with an existing row (e.g. a taken email).
  fn is_conflict(&self) -> bool { false }

  /// A write referenced a row that no longer exists (e.g. the owner of a new
  /// registered time).
  fn is_missing_reference(&self) -> bool { false }
}

impl StoreError for Infallible {}

/// Abstraction over the user (identity) store.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait UserStore: Send + Sync {
  type Error: StoreError;

  /// Persist a new user. Fails with a conflict if the email is already
  /// registered.
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<User, Self::Error>> + Send + '_;

  /// Retrieve a user by id. Returns `None` if not found.
  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Retrieve a user by email. Returns `None` if not found.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  fn list_users(&self) -> impl Future<Output = Result<Vec<User>, Self::Error>> + Send + '_;

  /// Apply `patch` to a user. Returns `None` if the user does not exist and
  /// fails with a conflict if the new email belongs to someone else.
  fn update_user(
    &self,
    id: Uuid,
    patch: UserPatch,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Delete a user and every time they registered. Returns `false` if the
  /// user did not exist.
  fn delete_user(&self, id: Uuid) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}

/// Abstraction over the registered-time store. Shares the error type of the
/// user store it extends.
pub trait TimeStore: UserStore {
  /// Record a time for `user_id`. Fails with a missing reference if the owner
  /// does not exist.
  fn record_time(
    &self,
    user_id: Uuid,
    time_registered: DateTime<Utc>,
  ) -> impl Future<Output = Result<RegisteredTime, Self::Error>> + Send + '_;

  fn get_time(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<RegisteredTime>, Self::Error>> + Send + '_;

  /// All registered times, oldest first.
  fn list_times(
    &self,
  ) -> impl Future<Output = Result<Vec<RegisteredTime>, Self::Error>> + Send + '_;

  fn list_times_for_user(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Vec<RegisteredTime>, Self::Error>> + Send + '_;

  /// Move an entry to a new instant. Returns `None` if it does not exist.
  fn update_time(
    &self,
    id: Uuid,
    time_registered: DateTime<Utc>,
  ) -> impl Future<Output = Result<Option<RegisteredTime>, Self::Error>> + Send + '_;

  /// Returns `false` if the entry did not exist.
  fn delete_time(&self, id: Uuid) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
