//! Authentication and authorization for Punch.
//!
//! - [`token`]: issues and verifies signed bearer tokens.
//! - [`password`]: one-way password hashing and verification.
//! - [`policy`]: the access policy evaluated before every protected operation.
//! - [`gateway`]: wraps operation handlers with the policy.
//! - [`signin`]: the email + password sign-in flow.
//!
//! Nothing here knows about HTTP; callers hand over the raw `Authorization`
//! header value.

pub mod error;
pub mod gateway;
pub mod password;
pub mod policy;
pub mod signin;
pub mod token;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use gateway::Gateway;
pub use policy::{AccessPolicy, Caller};
pub use token::{Claims, TokenService};
