//! In-process publish/subscribe for server-side notifications.
//!
//! Topics are opaque strings; payloads are `serde_json::Value` so each
//! producer serialises its own types. A subscription is an endless stream that
//! cannot be restarted: once dropped, a new one starts from the next event.

use std::{collections::HashMap, sync::Arc};

use futures::{StreamExt as _, stream::BoxStream};
use serde_json::Value;
use tokio::sync::{RwLock, broadcast};
use tokio_stream::wrappers::{BroadcastStream, errors::BroadcastStreamRecvError};

/// Published with the public view of every newly created user.
pub const CREATED_USER: &str = "created_user";

/// Topic-keyed broadcast hub. Cloning is cheap.
#[derive(Clone)]
pub struct EventBus {
  channels: Arc<RwLock<HashMap<String, broadcast::Sender<Value>>>>,
  capacity: usize,
}

impl EventBus {
  pub fn new() -> Self { Self::with_capacity(256) }

  /// `capacity` bounds how far a slow subscriber may fall behind before it
  /// starts missing events.
  pub fn with_capacity(capacity: usize) -> Self {
    Self { channels: Arc::new(RwLock::new(HashMap::new())), capacity }
  }

  /// Publish `payload` on `topic`. Returns the number of subscribers reached;
  /// publishing to a topic nobody listens on is a no-op.
  pub async fn publish(&self, topic: &str, payload: Value) -> usize {
    let channels = self.channels.read().await;
    channels
      .get(topic)
      .and_then(|tx| tx.send(payload).ok())
      .unwrap_or(0)
  }

  /// Subscribe to every event published on `topic` from now on.
  pub async fn subscribe(&self, topic: &str) -> BoxStream<'static, Value> {
    let rx = {
      let mut channels = self.channels.write().await;
      channels
        .entry(topic.to_owned())
        .or_insert_with(|| broadcast::channel(self.capacity).0)
        .subscribe()
    };

    let topic = topic.to_owned();
    BroadcastStream::new(rx).filter_map(move |item| {
      let topic = topic.clone();
      async move {
        match item {
          Ok(value) => Some(value),
          Err(BroadcastStreamRecvError::Lagged(missed)) => {
            tracing::warn!(%topic, missed, "subscriber lagged, events dropped");
            None
          }
        }
      }
    })
    .boxed()
  }
}

impl Default for EventBus {
  fn default() -> Self { Self::new() }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[tokio::test]
  async fn subscriber_receives_published_events() {
    let bus = EventBus::new();
    let mut events = bus.subscribe("topic").await;

    assert_eq!(bus.publish("topic", json!({"n": 1})).await, 1);
    assert_eq!(bus.publish("topic", json!({"n": 2})).await, 1);

    assert_eq!(events.next().await, Some(json!({"n": 1})));
    assert_eq!(events.next().await, Some(json!({"n": 2})));
  }

  #[tokio::test]
  async fn publish_without_subscribers_is_noop() {
    let bus = EventBus::new();
    assert_eq!(bus.publish("nobody", json!(null)).await, 0);
  }

  #[tokio::test]
  async fn topics_are_isolated() {
    let bus = EventBus::new();
    let mut a = bus.subscribe("a").await;
    let _b = bus.subscribe("b").await;

    bus.publish("b", json!("for b")).await;
    bus.publish("a", json!("for a")).await;

    assert_eq!(a.next().await, Some(json!("for a")));
  }

  #[tokio::test]
  async fn every_subscriber_gets_every_event() {
    let bus = EventBus::new();
    let mut one = bus.subscribe("t").await;
    let mut two = bus.subscribe("t").await;

    assert_eq!(bus.publish("t", json!(7)).await, 2);
    assert_eq!(one.next().await, Some(json!(7)));
    assert_eq!(two.next().await, Some(json!(7)));
  }

  #[tokio::test]
  async fn lagging_subscriber_skips_to_newest() {
    let bus = EventBus::with_capacity(2);
    let mut events = bus.subscribe("t").await;

    for n in 0..5 {
      bus.publish("t", json!(n)).await;
    }

    // The two most recent events survive the overflow.
    assert_eq!(events.next().await, Some(json!(3)));
    assert_eq!(events.next().await, Some(json!(4)));
  }
}
