//! `GET /subscriptions/created-users`: server-sent events, one per new user.
//!
//! The stream opens with a `connected` event, then emits a `created_user`
//! event carrying the user's public view for every `POST /users`.

use std::convert::Infallible;

use axum::{
  extract::State,
  response::sse::{Event, KeepAlive, Sse},
};
use futures::{Stream, StreamExt as _, stream};
use punch_core::store::TimeStore;

use crate::{AppState, bus};

pub async fn created_users<S>(
  State(state): State<AppState<S>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>>
where
  S: TimeStore + Clone + 'static,
{
  let connected =
    stream::once(async { Ok::<_, Infallible>(Event::default().event("connected").data("ok")) });

  let events = state
    .events
    .subscribe(bus::CREATED_USER)
    .await
    .filter_map(|payload| async move {
      Event::default()
        .event(bus::CREATED_USER)
        .json_data(&payload)
        .ok()
        .map(Ok)
    });

  Sse::new(connected.chain(events)).keep_alive(KeepAlive::default())
}
