//! Domain types for Punch: users, roles, registered times, the per-operation
//! access requirement, and the store traits backends implement.
//!
//! No HTTP, no SQL, no crypto here.

// Store traits spell out `impl Future + Send` where it matters.
#![allow(async_fn_in_trait)]

pub mod access;
pub mod error;
pub mod role;
pub mod store;
pub mod time;
pub mod user;

pub use error::{Error, Result};
