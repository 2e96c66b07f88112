//! In-process pub/sub hub for pushing live updates to SSE subscribers.
//!
//! Producers publish JSON events under a topic (`heat_map`), every connected
//! admin page subscribed to that topic receives a copy. Topics are plain
//! strings; the hub knows nothing about what flows through them.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::warn;

pub const DEFAULT_CAPACITY: usize = 64;

/// Topic-keyed broadcast channels. Cloneable, shared across handlers.
#[derive(Clone)]
pub struct StreamHub {
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<serde_json::Value>>>>,
    capacity: usize,
}

impl StreamHub {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` bounds how far a slow subscriber may fall behind before it
    /// starts missing events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Publish to a topic. Returns how many subscribers received the event;
    /// 0 when nobody is listening.
    pub async fn publish(&self, topic: &str, value: serde_json::Value) -> usize {
        let channels = self.channels.read().await;
        channels
            .get(topic)
            .and_then(|tx| tx.send(value).ok())
            .unwrap_or(0)
    }

    /// Serialize and publish an event, tagging it with `"type": event_type`.
    pub async fn publish_event<T: Serialize>(
        &self,
        topic: &str,
        event_type: &str,
        payload: &T,
    ) -> usize {
        match serde_json::to_value(payload) {
            Ok(data) => {
                self.publish(topic, serde_json::json!({"type": event_type, "data": data}))
                    .await
            }
            Err(e) => {
                warn!(error = %e, topic, event_type, "Failed to serialize stream event");
                0
            }
        }
    }

    /// Subscribe to a topic, creating its channel on first use.
    pub async fn subscribe(&self, topic: &str) -> broadcast::Receiver<serde_json::Value> {
        let mut channels = self.channels.write().await;
        channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    pub async fn subscriber_count(&self, topic: &str) -> usize {
        let channels = self.channels.read().await;
        channels.get(topic).map_or(0, |tx| tx.receiver_count())
    }
}

impl Default for StreamHub {
    fn default() -> Self {
        Self::new()
    }
}
