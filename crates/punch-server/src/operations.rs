//! Every operation the server exposes, with its declared access requirement.
//!
//! | Operation | Route | Requirement |
//! |-----------|-------|-------------|
//! | `allRegisteredTimes` | `GET /registered-times` | ADMIN |
//! | `allUsers` | `GET /users` | ADMIN |
//! | `createRegisteredTime` | `POST /registered-times` | WORKER |
//! | `updateRegisteredTime` | `PATCH /registered-times/{id}` | open |
//! | `deleteRegisteredTime` | `DELETE /registered-times/{id}` | ADMIN |
//! | `createUser` | `POST /users` | open |
//! | `updateUser` | `PATCH /users/{id}` | open |
//! | `deleteUser` | `DELETE /users/{id}` | open |
//! | `signin` | `POST /signin` | open |
//! | `onCreatedUser` | `GET /subscriptions/created-users` | open |

use punch_core::{access::Operation, role::Role};

pub static ALL_REGISTERED_TIMES: Operation = Operation::requires("allRegisteredTimes", Role::Admin);
pub static ALL_USERS: Operation = Operation::requires("allUsers", Role::Admin);

pub static CREATE_REGISTERED_TIME: Operation =
  Operation::requires("createRegisteredTime", Role::Worker);
pub static UPDATE_REGISTERED_TIME: Operation = Operation::open("updateRegisteredTime");
pub static DELETE_REGISTERED_TIME: Operation =
  Operation::requires("deleteRegisteredTime", Role::Admin);

pub static CREATE_USER: Operation = Operation::open("createUser");
pub static UPDATE_USER: Operation = Operation::open("updateUser");
pub static DELETE_USER: Operation = Operation::open("deleteUser");

pub static SIGNIN: Operation = Operation::open("signin");

pub static ON_CREATED_USER: Operation = Operation::open("onCreatedUser");
