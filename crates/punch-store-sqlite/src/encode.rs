//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are RFC 3339 strings, UUIDs hyphenated lowercase strings, and
//! roles their `WORKER` / `ADMIN` spelling.

use chrono::{DateTime, Utc};
use punch_core::{role::Role, time::RegisteredTime, user::User};
use uuid::Uuid;

use crate::{Error, Result};

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_role(role: Role) -> String { role.to_string() }

pub fn decode_role(s: &str) -> Result<Role> { Ok(Role::parse(s)?) }

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str = "user_id, name, email, password_hash, role, created_at";

pub const TIME_COLUMNS: &str = "entry_id, user_id, time_registered, created_at";

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub name:          String,
  pub email:         String,
  pub password_hash: String,
  pub role:          String,
  pub created_at:    String,
}

impl RawUser {
  /// Map a row selected with [`USER_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:       row.get(0)?,
      name:          row.get(1)?,
      email:         row.get(2)?,
      password_hash: row.get(3)?,
      role:          row.get(4)?,
      created_at:    row.get(5)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      name:          self.name,
      email:         self.email,
      password_hash: self.password_hash,
      role:          decode_role(&self.role)?,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `registered_times` row.
pub struct RawTime {
  pub entry_id:        String,
  pub user_id:         String,
  pub time_registered: String,
  pub created_at:      String,
}

impl RawTime {
  /// Map a row selected with [`TIME_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      entry_id:        row.get(0)?,
      user_id:         row.get(1)?,
      time_registered: row.get(2)?,
      created_at:      row.get(3)?,
    })
  }

  pub fn into_time(self) -> Result<RegisteredTime> {
    Ok(RegisteredTime {
      entry_id:        decode_uuid(&self.entry_id)?,
      user_id:         decode_uuid(&self.user_id)?,
      time_registered: decode_dt(&self.time_registered)?,
      created_at:      decode_dt(&self.created_at)?,
    })
  }
}
