//! Static access requirements attached to operations.
//!
//! Requirements are declared once, next to the operation's registration, and
//! evaluated by a single shared policy. They are never runtime data.

use serde::Serialize;

use crate::role::Role;

/// What an operation demands of its caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "role", rename_all = "snake_case")]
pub enum AccessRequirement {
  /// Anyone may call, with or without credentials.
  None,
  /// The caller must be authenticated and hold exactly this role.
  Role(Role),
}

impl AccessRequirement {
  /// Whether a caller holding `role` satisfies this requirement.
  pub fn is_satisfied_by(&self, role: Role) -> bool {
    match self {
      Self::None => true,
      Self::Role(required) => *required == role,
    }
  }
}

/// The registration entry of one operation: its name and its requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Operation {
  pub name:        &'static str,
  pub requirement: AccessRequirement,
}

impl Operation {
  pub const fn open(name: &'static str) -> Self {
    Self { name, requirement: AccessRequirement::None }
  }

  pub const fn requires(name: &'static str, role: Role) -> Self {
    Self { name, requirement: AccessRequirement::Role(role) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn role_requirement_is_exact_match() {
    let admin_only = AccessRequirement::Role(Role::Admin);
    assert!(admin_only.is_satisfied_by(Role::Admin));
    assert!(!admin_only.is_satisfied_by(Role::Worker));

    let worker_only = AccessRequirement::Role(Role::Worker);
    assert!(!worker_only.is_satisfied_by(Role::Admin));
  }

  #[test]
  fn no_requirement_admits_everyone() {
    assert!(AccessRequirement::None.is_satisfied_by(Role::Worker));
    assert!(AccessRequirement::None.is_satisfied_by(Role::Admin));
  }

  #[test]
  fn const_constructors() {
    const OP: Operation = Operation::requires("allUsers", Role::Admin);
    assert_eq!(OP.requirement, AccessRequirement::Role(Role::Admin));
    assert_eq!(Operation::open("signin").requirement, AccessRequirement::None);
  }
}
