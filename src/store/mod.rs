//! Store handle seam.
//!
//! A [`StoreHandle`] is a connected client for the backing system: keyed
//! string reads plus channel subscriptions. What actually speaks the store's
//! protocol lives behind a [`StoreFactory`]; this crate ships only the
//! in-process [`MemoryStore`].

/// Store error types.
pub mod error;
/// In-process store for local development and tests.
pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::descriptor::ConnectionDescriptor;

pub use error::StoreError;
pub use memory::MemoryStore;

/// A payload delivered on a pub/sub channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Channel the payload was published on.
    pub channel: String,
    /// Opaque payload; meaning is defined by the consumer's decoder.
    pub payload: String,
}

/// Stream of messages delivered by a channel subscription.
pub type MessageStream = BoxStream<'static, Message>;

/// A connected handle to the backing key/value + pub/sub system.
#[async_trait]
pub trait StoreHandle: Send + Sync {
    /// Point read of the string value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be reached or the read
    /// fails.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Subscribe to `channel`, receiving every payload published after the
    /// subscription is registered.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the subscription cannot be registered.
    async fn subscribe(&self, channel: &str) -> Result<MessageStream, StoreError>;

    /// Release the connection and any subscriptions registered through it.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if teardown fails; callers treat this as
    /// best-effort.
    async fn close(&self) -> Result<(), StoreError>;
}

/// Produces connected [`StoreHandle`]s from a [`ConnectionDescriptor`].
///
/// Implementations own protocol negotiation for the descriptor's topology
/// (standalone, sentinel, cluster); none is provided by this crate.
#[async_trait]
pub trait StoreFactory: Send + Sync {
    /// Connect to the store described by `descriptor`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::ConnectionFailed`] when the store cannot be
    /// reached within the descriptor's timeout.
    async fn connect(
        &self,
        descriptor: &ConnectionDescriptor,
    ) -> Result<Arc<dyn StoreHandle>, StoreError>;
}
