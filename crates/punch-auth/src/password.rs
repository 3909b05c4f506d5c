//! Password hashing with argon2.
//!
//! Hashes are PHC strings (`$argon2id$v=19$…`) carrying their own random salt
//! and parameters, so the same plaintext never hashes the same way twice.
//!
//! Both directions cost tens of milliseconds of CPU. Async callers use
//! [`spawn_hash`] and [`spawn_verify`], which run on tokio's blocking pool.

use argon2::{
  Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString,
};
use rand_core::OsRng;

use crate::{Error, Result};

/// Hash `plaintext` with a fresh random salt.
pub fn hash_password(plaintext: &str) -> Result<String> {
  let salt = SaltString::generate(&mut OsRng);
  Argon2::default()
    .hash_password(plaintext.as_bytes(), &salt)
    .map(|hash| hash.to_string())
    .map_err(|e| Error::Hashing(e.to_string()))
}

/// Check `plaintext` against a stored PHC string.
///
/// An unparsable stored hash never matches. The comparison itself is
/// constant-time inside `argon2`.
pub fn verify_password(plaintext: &str, hash: &str) -> bool {
  let Ok(parsed) = PasswordHash::new(hash) else {
    tracing::warn!("stored password hash is not a valid PHC string");
    return false;
  };

  Argon2::default()
    .verify_password(plaintext.as_bytes(), &parsed)
    .is_ok()
}

/// [`hash_password`] on the blocking pool.
pub async fn spawn_hash(plaintext: String) -> Result<String> {
  tokio::task::spawn_blocking(move || hash_password(&plaintext))
    .await
    .map_err(|e| Error::Hashing(e.to_string()))?
}

/// [`verify_password`] on the blocking pool. A panicked or cancelled task
/// never matches.
pub async fn spawn_verify(plaintext: String, hash: String) -> bool {
  tokio::task::spawn_blocking(move || verify_password(&plaintext, &hash))
    .await
    .unwrap_or_else(|e| {
      tracing::error!(error = %e, "password verification task failed");
      false
    })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn correct_password_verifies() {
    let hash = hash_password("hunter2").unwrap();
    assert!(hash.starts_with("$argon2"));
    assert!(verify_password("hunter2", &hash));
  }

  #[test]
  fn wrong_password_fails() {
    let hash = hash_password("hunter2").unwrap();
    assert!(!verify_password("hunter3", &hash));
    assert!(!verify_password("", &hash));
  }

  #[test]
  fn salts_differ_between_calls() {
    let a = hash_password("same").unwrap();
    let b = hash_password("same").unwrap();
    assert_ne!(a, b);
    assert!(verify_password("same", &a));
    assert!(verify_password("same", &b));
  }

  #[test]
  fn hash_is_not_plaintext() {
    let hash = hash_password("plain").unwrap();
    assert!(!hash.contains("plain"));
  }

  #[test]
  fn malformed_hash_never_matches() {
    assert!(!verify_password("anything", "not-a-phc-string"));
    assert!(!verify_password("anything", ""));
  }

  #[tokio::test]
  async fn blocking_pool_helpers_agree_with_inline_ones() {
    let hash = spawn_hash("hunter2".to_owned()).await.unwrap();
    assert!(verify_password("hunter2", &hash));
    assert!(spawn_verify("hunter2".to_owned(), hash.clone()).await);
    assert!(!spawn_verify("hunter3".to_owned(), hash).await);
    assert!(!spawn_verify("x".to_owned(), "not-a-phc-string".to_owned()).await);
  }
}
