//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::{DateTime, TimeZone as _, Utc};
use punch_core::{
  role::Role,
  store::{StoreError as _, TimeStore, UserStore},
  user::{NewUser, UserPatch},
};
use uuid::Uuid;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn new_user(email: &str, role: Role) -> NewUser {
  NewUser {
    name:          "Ada Lovelace".into(),
    email:         email.into(),
    password_hash: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$aGFzaA".into(),
    role,
  }
}

fn at(hour: u32) -> DateTime<Utc> { Utc.with_ymd_and_hms(2024, 3, 1, hour, 0, 0).unwrap() }

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;

  let user = s.create_user(new_user("ada@example.com", Role::Admin)).await.unwrap();
  assert_eq!(user.role, Role::Admin);

  let fetched = s.get_user(user.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.user_id, user.user_id);
  assert_eq!(fetched.email, "ada@example.com");
  assert_eq!(fetched.role, Role::Admin);
  assert_eq!(fetched.password_hash, user.password_hash);
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

#[tokio::test]
async fn find_user_by_email() {
  let s = store().await;
  let user = s.create_user(new_user("ada@example.com", Role::Worker)).await.unwrap();

  let found = s.find_user_by_email("ada@example.com").await.unwrap().unwrap();
  assert_eq!(found.user_id, user.user_id);
  assert!(s.find_user_by_email("bob@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_rejected() {
  let s = store().await;
  s.create_user(new_user("ada@example.com", Role::Worker)).await.unwrap();

  let err = s.create_user(new_user("ada@example.com", Role::Admin)).await.unwrap_err();
  assert!(err.is_conflict());
  assert!(!err.is_missing_reference());
  assert!(matches!(err, Error::EmailTaken(e) if e == "ada@example.com"));
  assert_eq!(s.list_users().await.unwrap().len(), 1);
}

#[tokio::test]
async fn list_users_returns_all() {
  let s = store().await;
  s.create_user(new_user("a@example.com", Role::Worker)).await.unwrap();
  s.create_user(new_user("b@example.com", Role::Admin)).await.unwrap();

  let users = s.list_users().await.unwrap();
  assert_eq!(users.len(), 2);
}

#[tokio::test]
async fn update_user_applies_only_given_fields() {
  let s = store().await;
  let user = s.create_user(new_user("ada@example.com", Role::Worker)).await.unwrap();

  let patch = UserPatch { role: Some(Role::Admin), ..Default::default() };
  let updated = s.update_user(user.user_id, patch).await.unwrap().unwrap();
  assert_eq!(updated.role, Role::Admin);
  assert_eq!(updated.name, "Ada Lovelace");
  assert_eq!(updated.email, "ada@example.com");
  assert_eq!(updated.password_hash, user.password_hash);
}

#[tokio::test]
async fn update_user_missing_returns_none() {
  let s = store().await;
  let patch = UserPatch { name: Some("x".into()), ..Default::default() };
  assert!(s.update_user(Uuid::new_v4(), patch).await.unwrap().is_none());
}

#[tokio::test]
async fn update_user_email_collision() {
  let s = store().await;
  s.create_user(new_user("a@example.com", Role::Worker)).await.unwrap();
  let b = s.create_user(new_user("b@example.com", Role::Worker)).await.unwrap();

  let patch = UserPatch { email: Some("a@example.com".into()), ..Default::default() };
  let err = s.update_user(b.user_id, patch).await.unwrap_err();
  assert!(err.is_conflict());
  assert!(matches!(err, Error::EmailTaken(_)));

  // Re-asserting one's own email is not a collision.
  let patch = UserPatch { email: Some("b@example.com".into()), ..Default::default() };
  assert!(s.update_user(b.user_id, patch).await.unwrap().is_some());
}

#[tokio::test]
async fn delete_user() {
  let s = store().await;
  let user = s.create_user(new_user("ada@example.com", Role::Worker)).await.unwrap();

  assert!(s.delete_user(user.user_id).await.unwrap());
  assert!(s.get_user(user.user_id).await.unwrap().is_none());
  assert!(!s.delete_user(user.user_id).await.unwrap());
}

// ─── Registered times ────────────────────────────────────────────────────────

#[tokio::test]
async fn record_and_get_time() {
  let s = store().await;
  let user = s.create_user(new_user("ada@example.com", Role::Worker)).await.unwrap();

  let entry = s.record_time(user.user_id, at(9)).await.unwrap();
  assert_eq!(entry.user_id, user.user_id);

  let fetched = s.get_time(entry.entry_id).await.unwrap().unwrap();
  assert_eq!(fetched.time_registered, at(9));
  assert_eq!(fetched.user_id, user.user_id);
}

#[tokio::test]
async fn record_time_for_unknown_user_fails() {
  let s = store().await;
  let ghost = Uuid::new_v4();
  let err = s.record_time(ghost, at(9)).await.unwrap_err();
  assert!(err.is_missing_reference());
  assert!(!err.is_conflict());
  assert!(matches!(err, Error::UserNotFound(id) if id == ghost));
  assert!(s.list_times().await.unwrap().is_empty());
}

#[tokio::test]
async fn list_times_is_chronological_and_filterable() {
  let s = store().await;
  let ada = s.create_user(new_user("ada@example.com", Role::Worker)).await.unwrap();
  let bob = s.create_user(new_user("bob@example.com", Role::Worker)).await.unwrap();

  s.record_time(ada.user_id, at(17)).await.unwrap();
  s.record_time(bob.user_id, at(8)).await.unwrap();
  s.record_time(ada.user_id, at(9)).await.unwrap();

  let all = s.list_times().await.unwrap();
  let hours: Vec<_> = all.iter().map(|t| t.time_registered).collect();
  assert_eq!(hours, vec![at(8), at(9), at(17)]);

  let adas = s.list_times_for_user(ada.user_id).await.unwrap();
  assert_eq!(adas.len(), 2);
  assert!(adas.iter().all(|t| t.user_id == ada.user_id));
}

#[tokio::test]
async fn update_time() {
  let s = store().await;
  let user = s.create_user(new_user("ada@example.com", Role::Worker)).await.unwrap();
  let entry = s.record_time(user.user_id, at(9)).await.unwrap();

  let updated = s.update_time(entry.entry_id, at(10)).await.unwrap().unwrap();
  assert_eq!(updated.time_registered, at(10));
  assert_eq!(updated.entry_id, entry.entry_id);

  assert!(s.update_time(Uuid::new_v4(), at(10)).await.unwrap().is_none());
}

#[tokio::test]
async fn delete_time() {
  let s = store().await;
  let user = s.create_user(new_user("ada@example.com", Role::Worker)).await.unwrap();
  let entry = s.record_time(user.user_id, at(9)).await.unwrap();

  assert!(s.delete_time(entry.entry_id).await.unwrap());
  assert!(s.get_time(entry.entry_id).await.unwrap().is_none());
  assert!(!s.delete_time(entry.entry_id).await.unwrap());
}

#[tokio::test]
async fn deleting_user_cascades_to_times() {
  let s = store().await;
  let ada = s.create_user(new_user("ada@example.com", Role::Worker)).await.unwrap();
  let bob = s.create_user(new_user("bob@example.com", Role::Worker)).await.unwrap();
  s.record_time(ada.user_id, at(9)).await.unwrap();
  s.record_time(bob.user_id, at(10)).await.unwrap();

  s.delete_user(ada.user_id).await.unwrap();

  let remaining = s.list_times().await.unwrap();
  assert_eq!(remaining.len(), 1);
  assert_eq!(remaining[0].user_id, bob.user_id);
}
