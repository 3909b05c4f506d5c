//! axum middleware that puts the operation gateway in front of a route.
//!
//! Each route is wrapped with the [`Operation`] it implements. The middleware
//! hands the raw `Authorization` header to [`Gateway::invoke`]; on success the
//! established [`Caller`](punch_auth::Caller) is inserted into the request
//! extensions and the inner handler runs, otherwise the denial is returned.

use axum::{
  extract::{Request, State},
  http::header,
  middleware::{self, Next},
  response::{IntoResponse, Response},
  routing::MethodRouter,
};
use punch_auth::Gateway;
use punch_core::{access::Operation, store::UserStore};

use crate::error::Error;

/// Middleware state: the shared gateway plus the operation being guarded.
pub struct Guard<S> {
  gateway:   Gateway<S>,
  operation: &'static Operation,
}

impl<S> Clone for Guard<S> {
  fn clone(&self) -> Self { Self { gateway: self.gateway.clone(), operation: self.operation } }
}

/// Wrap `route` so every request first passes `operation`'s requirement.
pub fn guarded<S, T>(
  gateway:   &Gateway<S>,
  operation: &'static Operation,
  route:     MethodRouter<T>,
) -> MethodRouter<T>
where
  S: UserStore + 'static,
  T: Clone + Send + Sync + 'static,
{
  let guard = Guard { gateway: gateway.clone(), operation };
  // Only the handlers are gated. An unsupported method still reaches the
  // plain 405 fallback instead of inheriting some operation's requirement.
  route.route_layer(middleware::from_fn_with_state(guard, gate::<S>))
}

async fn gate<S>(State(guard): State<Guard<S>>, mut req: Request, next: Next) -> Response
where
  S: UserStore + 'static,
{
  let authorization = req
    .headers()
    .get(header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .map(str::to_owned);

  guard
    .gateway
    .invoke(guard.operation, authorization.as_deref(), |caller| async move {
      req.extensions_mut().insert(caller);
      Ok::<_, Error>(next.run(req).await)
    })
    .await
    .unwrap_or_else(IntoResponse::into_response)
}
