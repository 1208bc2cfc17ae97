use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use futures::StreamExt;
use tokio::sync::{RwLock, broadcast};
use tokio_stream::wrappers::BroadcastStream;
use tracing::debug;

use super::{Message, MessageStream, StoreError, StoreHandle};

const CHANNEL_CAPACITY: usize = 64;

/// An in-process key/value store with pub/sub channels.
///
/// Backs a [`LiveSource`](crate::LiveSource) without any external system:
/// values live in a shared map, channels fan out over broadcast channels.
/// Clones share state, so one clone can act as the producer while another is
/// handed to a source as its [`StoreHandle`].
///
/// Like a real store, `set` and `publish` are independent operations. A
/// producer that wants readers of the key and subscribers of the channel to
/// agree should use [`set_then_publish`](Self::set_then_publish), which
/// applies both under a single write lock.
#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Arc<RwLock<HashMap<String, String>>>,
    channels: Arc<RwLock<HashMap<String, broadcast::Sender<Message>>>>,
    released: Arc<AtomicBool>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `value` under `key`, replacing any previous value.
    pub async fn set(&self, key: impl Into<String>, value: impl Into<String>) {
        self.values.write().await.insert(key.into(), value.into());
    }

    /// Publish `payload` on `channel`.
    ///
    /// Returns the number of subscribers that received the payload.
    /// Subscribers registered after the publish do not see it.
    pub async fn publish(&self, channel: &str, payload: impl Into<String>) -> usize {
        let channels = self.channels.read().await;
        let Some(sender) = channels.get(channel) else {
            debug!("No subscribers on channel {channel}");
            return 0;
        };
        sender
            .send(Message {
                channel: channel.to_owned(),
                payload: payload.into(),
            })
            .unwrap_or(0)
    }

    /// Store `payload` under `key` and publish it on `channel` atomically
    /// with respect to other writers of this store.
    ///
    /// This is the producer contract a live source expects: the stored value
    /// and the published payload never diverge.
    pub async fn set_then_publish(
        &self,
        key: impl Into<String>,
        channel: &str,
        payload: impl Into<String>,
    ) -> usize {
        let payload = payload.into();
        let mut values = self.values.write().await;
        values.insert(key.into(), payload.clone());
        let channels = self.channels.read().await;
        match channels.get(channel) {
            Some(sender) => sender
                .send(Message {
                    channel: channel.to_owned(),
                    payload,
                })
                .unwrap_or(0),
            None => 0,
        }
    }

    async fn sender(&self, channel: &str) -> broadcast::Sender<Message> {
        let mut channels = self.channels.write().await;
        channels
            .entry(channel.to_owned())
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }

    fn check_open(&self) -> Result<(), StoreError> {
        if self.released.load(Ordering::SeqCst) {
            return Err(StoreError::ConnectionReleased);
        }
        Ok(())
    }
}

#[async_trait]
impl StoreHandle for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check_open()?;
        Ok(self.values.read().await.get(key).cloned())
    }

    async fn subscribe(&self, channel: &str) -> Result<MessageStream, StoreError> {
        self.check_open()?;
        let receiver = self.sender(channel).await.subscribe();
        // Lagged receivers drop the missed messages and keep going.
        let stream = BroadcastStream::new(receiver)
            .filter_map(|message| futures::future::ready(message.ok()));
        Ok(stream.boxed())
    }

    async fn close(&self) -> Result<(), StoreError> {
        self.released.store(true, Ordering::SeqCst);
        self.channels.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let store = MemoryStore::new();
        store.set("k", "v").await;

        let value = store.get("k").await.ok().flatten();

        assert_eq!(value.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn publish_reaches_only_existing_subscribers() {
        let store = MemoryStore::new();
        assert_eq!(store.publish("ch", "early").await, 0);

        let mut subscription = match store.subscribe("ch").await {
            Ok(stream) => stream,
            Err(e) => panic!("subscribe failed: {e}"),
        };
        assert_eq!(store.publish("ch", "later").await, 1);

        let message = subscription.next().await;
        assert_eq!(message.map(|m| m.payload).as_deref(), Some("later"));
    }

    #[tokio::test]
    async fn released_connection_rejects_reads() {
        let store = MemoryStore::new();
        store.set("k", "v").await;

        assert!(store.close().await.is_ok());

        assert!(matches!(
            store.get("k").await,
            Err(StoreError::ConnectionReleased)
        ));
    }
}
