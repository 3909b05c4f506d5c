//! Roles: the coarse permission tiers attached to every user.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::Error;

/// Permission tier of a user. Spelled `WORKER` / `ADMIN` on the wire and in
/// storage.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
  Worker,
  Admin,
}

impl Role {
  /// Parse the stored textual form, rejecting anything but the two tiers.
  pub fn parse(s: &str) -> Result<Self, Error> {
    s.parse().map_err(|_| Error::UnknownRole(s.to_owned()))
  }
}
