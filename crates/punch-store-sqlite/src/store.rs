//! [`SqliteStore`], the SQLite implementation of [`UserStore`] and [`TimeStore`].

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use punch_core::{
  store::{TimeStore, UserStore},
  time::RegisteredTime,
  user::{NewUser, User, UserPatch},
};

use crate::{
  Error, Result,
  encode::{RawTime, RawUser, TIME_COLUMNS, USER_COLUMNS, encode_dt, encode_role, encode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Punch store backed by a single SQLite file.
///
/// Cloning is cheap: the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// What happened inside the update transaction.
enum UpdateOutcome {
  Missing,
  EmailTaken(String),
  Updated(RawUser),
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store: useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Fetch at most one user matching `column = value`.
  async fn user_where(&self, column: &'static str, value: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1"),
            rusqlite::params![value],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  /// Fetch registered times, optionally restricted to one owner.
  async fn times_where(&self, user_id: Option<Uuid>) -> Result<Vec<RegisteredTime>> {
    let user_str = user_id.map(encode_uuid);

    let raws: Vec<RawTime> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TIME_COLUMNS} FROM registered_times
           WHERE ?1 IS NULL OR user_id = ?1
           ORDER BY time_registered, created_at"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], RawTime::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTime::into_time).collect()
  }
}

// ─── UserStore impl ──────────────────────────────────────────────────────────

impl UserStore for SqliteStore {
  type Error = Error;

  async fn create_user(&self, input: NewUser) -> Result<User> {
    let user = User {
      user_id:       Uuid::new_v4(),
      name:          input.name,
      email:         input.email,
      password_hash: input.password_hash,
      role:          input.role,
      created_at:    Utc::now(),
    };

    let id_str   = encode_uuid(user.user_id);
    let name     = user.name.clone();
    let email    = user.email.clone();
    let hash     = user.password_hash.clone();
    let role_str = encode_role(user.role);
    let at_str   = encode_dt(user.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO users (user_id, name, email, password_hash, role, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT (email) DO NOTHING",
          rusqlite::params![id_str, name, email, hash, role_str, at_str],
        )?;
        Ok(changed == 1)
      })
      .await?;

    if !inserted {
      return Err(Error::EmailTaken(user.email));
    }
    Ok(user)
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.user_where("user_id", encode_uuid(id)).await
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    self.user_where("email", email.to_owned()).await
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users ORDER BY created_at, email"
        ))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn update_user(&self, id: Uuid, patch: UserPatch) -> Result<Option<User>> {
    let id_str   = encode_uuid(id);
    let role_str = patch.role.map(encode_role);
    let UserPatch { name, email, password_hash, .. } = patch;

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let exists = tx
          .query_row(
            "SELECT 1 FROM users WHERE user_id = ?1",
            rusqlite::params![id_str],
            |_| Ok(()),
          )
          .optional()?
          .is_some();
        if !exists {
          return Ok(UpdateOutcome::Missing);
        }

        if let Some(email) = &email {
          let taken = tx
            .query_row(
              "SELECT 1 FROM users WHERE email = ?1 AND user_id != ?2",
              rusqlite::params![email, id_str],
              |_| Ok(()),
            )
            .optional()?
            .is_some();
          if taken {
            return Ok(UpdateOutcome::EmailTaken(email.clone()));
          }
        }

        tx.execute(
          "UPDATE users SET
             name          = COALESCE(?2, name),
             email         = COALESCE(?3, email),
             password_hash = COALESCE(?4, password_hash),
             role          = COALESCE(?5, role)
           WHERE user_id = ?1",
          rusqlite::params![id_str, name, email, password_hash, role_str],
        )?;

        let raw = tx.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
          rusqlite::params![id_str],
          RawUser::from_row,
        )?;
        tx.commit()?;
        Ok(UpdateOutcome::Updated(raw))
      })
      .await?;

    match outcome {
      UpdateOutcome::Missing => Ok(None),
      UpdateOutcome::EmailTaken(email) => Err(Error::EmailTaken(email)),
      UpdateOutcome::Updated(raw) => raw.into_user().map(Some),
    }
  }

  async fn delete_user(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let deleted = self
      .conn
      .call(move |conn| {
        // registered_times rows go with it via ON DELETE CASCADE.
        let changed = conn.execute(
          "DELETE FROM users WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        Ok(changed > 0)
      })
      .await?;

    Ok(deleted)
  }
}

// ─── TimeStore impl ──────────────────────────────────────────────────────────

impl TimeStore for SqliteStore {
  async fn record_time(
    &self,
    user_id:         Uuid,
    time_registered: DateTime<Utc>,
  ) -> Result<RegisteredTime> {
    let entry = RegisteredTime {
      entry_id: Uuid::new_v4(),
      user_id,
      time_registered,
      created_at: Utc::now(),
    };

    let entry_str = encode_uuid(entry.entry_id);
    let user_str  = encode_uuid(user_id);
    let at_str    = encode_dt(entry.time_registered);
    let made_str  = encode_dt(entry.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        let changed = conn.execute(
          "INSERT INTO registered_times (entry_id, user_id, time_registered, created_at)
           SELECT ?1, ?2, ?3, ?4
           WHERE EXISTS (SELECT 1 FROM users WHERE user_id = ?2)",
          rusqlite::params![entry_str, user_str, at_str, made_str],
        )?;
        Ok(changed == 1)
      })
      .await?;

    if !inserted {
      return Err(Error::UserNotFound(user_id));
    }
    Ok(entry)
  }

  async fn get_time(&self, id: Uuid) -> Result<Option<RegisteredTime>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawTime> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TIME_COLUMNS} FROM registered_times WHERE entry_id = ?1"),
            rusqlite::params![id_str],
            RawTime::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTime::into_time).transpose()
  }

  async fn list_times(&self) -> Result<Vec<RegisteredTime>> { self.times_where(None).await }

  async fn list_times_for_user(&self, user_id: Uuid) -> Result<Vec<RegisteredTime>> {
    self.times_where(Some(user_id)).await
  }

  async fn update_time(
    &self,
    id:              Uuid,
    time_registered: DateTime<Utc>,
  ) -> Result<Option<RegisteredTime>> {
    let id_str = encode_uuid(id);
    let at_str = encode_dt(time_registered);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE registered_times SET time_registered = ?2 WHERE entry_id = ?1",
          rusqlite::params![id_str, at_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_time(id).await
  }

  async fn delete_time(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM registered_times WHERE entry_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }
}
