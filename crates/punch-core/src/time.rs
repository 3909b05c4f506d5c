//! Registered times: the clock-in records a worker files for themselves.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single time entry. Owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisteredTime {
  pub entry_id:        Uuid,
  pub user_id:         Uuid,
  /// The moment the worker registered.
  pub time_registered: DateTime<Utc>,
  pub created_at:      DateTime<Utc>,
}
