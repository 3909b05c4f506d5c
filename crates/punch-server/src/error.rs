//! Error types and axum `IntoResponse` implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Auth(#[from] punch_auth::Error),
  #[error("not found: {0}")]
  NotFound(String),
  #[error("bad request: {0}")]
  BadRequest(String),
  #[error("conflict: {0}")]
  Conflict(String),
  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  fn status(&self) -> StatusCode {
    use punch_auth::Error as Auth;

    match self {
      Error::Auth(Auth::Unauthenticated | Auth::InvalidCredentials | Auth::InvalidToken(_)) => {
        StatusCode::UNAUTHORIZED
      }
      Error::Auth(Auth::Forbidden { .. }) => StatusCode::FORBIDDEN,
      Error::Auth(_) | Error::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      Error::NotFound(_) => StatusCode::NOT_FOUND,
      Error::BadRequest(_) => StatusCode::BAD_REQUEST,
      Error::Conflict(_) => StatusCode::CONFLICT,
    }
  }
}

impl IntoResponse for Error {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }

    let mut res = (status, Json(json!({ "error": self.to_string() }))).into_response();
    if status == StatusCode::UNAUTHORIZED {
      res.headers_mut().insert(
        header::WWW_AUTHENTICATE,
        HeaderValue::from_static("Bearer realm=\"punch\""),
      );
    }
    res
  }
}

#[cfg(test)]
mod tests {
  use punch_core::role::Role;

  use super::*;

  #[test]
  fn auth_errors_map_to_distinct_statuses() {
    let unauth = Error::from(punch_auth::Error::Unauthenticated).into_response();
    assert_eq!(unauth.status(), StatusCode::UNAUTHORIZED);
    assert!(unauth.headers().contains_key(header::WWW_AUTHENTICATE));

    let forbidden = Error::from(punch_auth::Error::Forbidden { required: Role::Admin });
    assert_eq!(forbidden.into_response().status(), StatusCode::FORBIDDEN);

    let creds = Error::from(punch_auth::Error::InvalidCredentials);
    assert_eq!(creds.into_response().status(), StatusCode::UNAUTHORIZED);
  }

  #[test]
  fn domain_errors() {
    assert_eq!(Error::NotFound("x".into()).into_response().status(), StatusCode::NOT_FOUND);
    assert_eq!(Error::Conflict("x".into()).into_response().status(), StatusCode::CONFLICT);
    assert_eq!(
      Error::Auth(punch_auth::Error::Hashing("x".into())).into_response().status(),
      StatusCode::INTERNAL_SERVER_ERROR,
    );
  }
}
