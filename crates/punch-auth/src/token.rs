//! Signed bearer tokens (HS256 JWT).
//!
//! The signing secret is injected at construction; there is no built-in
//! default. Every decode verifies signature and issuer.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Claims carried by a Punch token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
  /// The user the token was issued to.
  pub sub: Uuid,
  pub iat: i64,
  pub iss: String,
  /// Only present when the service was configured with a lifetime.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub exp: Option<i64>,
}

/// Issues and verifies tokens with a process-wide shared secret.
#[derive(Clone)]
pub struct TokenService {
  encoding_key: EncodingKey,
  decoding_key: DecodingKey,
  issuer:       String,
  ttl:          Option<Duration>,
  validation:   Validation,
}

impl TokenService {
  /// Build a service signing with `secret`. With `ttl = None` tokens never
  /// expire.
  pub fn new(secret: &[u8], issuer: impl Into<String>, ttl: Option<Duration>) -> Self {
    let issuer = issuer.into();

    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_issuer(&[&issuer]);
    if ttl.is_none() {
      // No `exp` is minted, so it cannot be demanded.
      validation.required_spec_claims.clear();
    }

    Self {
      encoding_key: EncodingKey::from_secret(secret),
      decoding_key: DecodingKey::from_secret(secret),
      issuer,
      ttl,
      validation,
    }
  }

  /// Produce a signed token whose subject is `subject`.
  pub fn issue(&self, subject: Uuid) -> Result<String> {
    let now = Utc::now();
    let exp = match self.ttl {
      Some(ttl) => Some(now.checked_add_signed(ttl).ok_or(Error::LifetimeOverflow)?.timestamp()),
      None => None,
    };
    let claims = Claims { sub: subject, iat: now.timestamp(), iss: self.issuer.clone(), exp };

    jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
      .map_err(Error::TokenEncoding)
  }

  /// Parse and verify `token`. Malformed, tampered, foreign-issuer and
  /// expired tokens all fail with [`Error::InvalidToken`].
  pub fn decode(&self, token: &str) -> Result<Claims> {
    let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)?;
    Ok(data.claims)
  }
}
