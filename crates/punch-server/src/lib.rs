//! HTTP surface of the Punch time-tracking service.
//!
//! Exposes an axum [`Router`] backed by any [`TimeStore`]. Every route is
//! registered through the operation gateway with the requirement declared in
//! [`operations`].

pub mod bus;
pub mod error;
pub mod gate;
pub mod handlers;
pub mod operations;

pub use error::Error;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get, patch, post},
};
use chrono::{TimeDelta, Utc};
use punch_auth::{AccessPolicy, Gateway, TokenService};
use punch_core::store::TimeStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use bus::EventBus;
use gate::guarded;
use handlers::{session, subscriptions, times, users};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PUNCH_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// Shared HS256 signing secret. Required; there is no built-in default.
  pub token_secret:   String,
  #[serde(default = "default_issuer")]
  pub token_issuer:   String,
  /// Token lifetime. Tokens never expire when unset.
  #[serde(default)]
  pub token_ttl_secs: Option<u64>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 4000 }

fn default_store_path() -> PathBuf { PathBuf::from("punch.db") }

fn default_issuer() -> String { "punch".to_string() }

/// Settings that deserialise but cannot be served with.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("token_ttl_secs = {0} is too large for a token expiry")]
  TokenTtl(u64),
}

impl ServerConfig {
  /// The configured token lifetime, checked against the calendar so that
  /// issuing a token can never overflow.
  pub fn token_ttl(&self) -> Result<Option<TimeDelta>, ConfigError> {
    let Some(secs) = self.token_ttl_secs else {
      return Ok(None);
    };
    i64::try_from(secs)
      .ok()
      .and_then(TimeDelta::try_seconds)
      .filter(|ttl| Utc::now().checked_add_signed(*ttl).is_some())
      .map(Some)
      .ok_or(ConfigError::TokenTtl(secs))
  }

  pub fn token_service(&self) -> Result<TokenService, ConfigError> {
    let ttl = self.token_ttl()?;
    Ok(TokenService::new(self.token_secret.as_bytes(), self.token_issuer.clone(), ttl))
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: TimeStore> {
  pub store:   Arc<S>,
  pub tokens:  Arc<TokenService>,
  pub gateway: Gateway<S>,
  pub events:  EventBus,
  pub config:  Arc<ServerConfig>,
}

impl<S: TimeStore> AppState<S> {
  /// Fails only if `config` cannot produce a token service.
  pub fn new(store: S, config: ServerConfig) -> Result<Self, ConfigError> {
    let store  = Arc::new(store);
    let tokens = Arc::new(config.token_service()?);
    let policy = AccessPolicy::new(Arc::clone(&store), Arc::clone(&tokens));

    Ok(Self {
      store,
      tokens,
      gateway: Gateway::new(policy),
      events: EventBus::new(),
      config: Arc::new(config),
    })
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build an axum [`Router`] for the Punch API.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: TimeStore + Clone + 'static,
{
  use operations as ops;
  let gw = &state.gateway;

  Router::new()
    .route("/signin", guarded(gw, &ops::SIGNIN, post(session::sign_in::<S>)))
    .route(
      "/users",
      guarded(gw, &ops::ALL_USERS, get(users::list::<S>))
        .merge(guarded(gw, &ops::CREATE_USER, post(users::create::<S>))),
    )
    .route(
      "/users/{id}",
      guarded(gw, &ops::UPDATE_USER, patch(users::update::<S>))
        .merge(guarded(gw, &ops::DELETE_USER, delete(users::remove::<S>))),
    )
    .route(
      "/registered-times",
      guarded(gw, &ops::ALL_REGISTERED_TIMES, get(times::list::<S>))
        .merge(guarded(gw, &ops::CREATE_REGISTERED_TIME, post(times::create::<S>))),
    )
    .route(
      "/registered-times/{id}",
      guarded(gw, &ops::UPDATE_REGISTERED_TIME, patch(times::update::<S>))
        .merge(guarded(gw, &ops::DELETE_REGISTERED_TIME, delete(times::remove::<S>))),
    )
    .route(
      "/subscriptions/created-users",
      guarded(gw, &ops::ON_CREATED_USER, get(subscriptions::created_users::<S>)),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
