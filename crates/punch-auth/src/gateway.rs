//! Operation gateway: runs the access policy in front of a handler.
//!
//! Every operation is registered with an [`Operation`] entry carrying its
//! static requirement. [`Gateway::invoke`] evaluates that requirement and only
//! then hands control (and the established [`Caller`]) to the handler. A denial
//! becomes the operation's result and the handler never runs.

use std::future::Future;

use punch_core::{access::Operation, store::UserStore};

use crate::{Error, policy::{AccessPolicy, Caller}};

pub struct Gateway<S> {
  policy: AccessPolicy<S>,
}

impl<S> Clone for Gateway<S> {
  fn clone(&self) -> Self { Self { policy: self.policy.clone() } }
}

impl<S: UserStore> Gateway<S> {
  pub fn new(policy: AccessPolicy<S>) -> Self { Self { policy } }

  pub fn policy(&self) -> &AccessPolicy<S> { &self.policy }

  /// Authorize `operation` for a request carrying `authorization`, then run
  /// `handler`. The handler's own result is passed through untouched.
  pub async fn invoke<F, Fut, T, E>(
    &self,
    operation:     &Operation,
    authorization: Option<&str>,
    handler:       F,
  ) -> Result<T, E>
  where
    F: FnOnce(Caller) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<Error>,
  {
    let caller = self
      .policy
      .authorize(operation.requirement, authorization)
      .await
      .inspect_err(|e| {
        tracing::debug!(operation = operation.name, error = %e, "operation denied");
      })?;

    handler(caller).await
  }
}
