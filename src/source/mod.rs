//! The sync engine: binds a [`Property`] to a store key and channel.
//!
//! A [`LiveSource`] performs a best-effort initial load of its key, then
//! keeps the property synchronized by decoding every payload published on
//! its channel. It is read-only: nothing here ever writes to the store.

/// Source error types.
pub mod error;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::{Stream, StreamExt};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::decode::Decoder;
use crate::descriptor::ConnectionDescriptor;
use crate::property::Property;
use crate::store::{MessageStream, StoreFactory, StoreHandle};

pub use error::SourceError;

/// A read-only configuration value kept synchronized with a key/value store.
///
/// Construction loads the value stored under `key` once, best-effort, then
/// subscribes to `channel`; every published payload is decoded and replaces
/// the in-memory value. Consumers read through [`get`](Self::get) or observe
/// changes through [`watch`](Self::watch).
///
/// The initial load is deliberately non-fatal: if the store is unreachable
/// or holds a malformed value at startup, the source still constructs with
/// an absent value and catches up on the first valid publish.
///
/// Clones share the same property, subscription, and connection; closing any
/// clone closes them all.
#[derive(Clone)]
pub struct LiveSource<T: Clone + Send + Sync + 'static> {
    handle: Arc<dyn StoreHandle>,
    property: Property<Option<T>>,
    key: String,
    dispatch: Arc<Mutex<Option<JoinHandle<()>>>>,
    closed: Arc<AtomicBool>,
}

impl<T: Clone + Send + Sync + 'static> LiveSource<T> {
    /// Connect through `factory` and start a source on the resulting handle.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidConfiguration`] for an empty key or
    /// channel, and [`SourceError::Store`] when the factory cannot connect
    /// or the channel subscription cannot be registered.
    pub async fn connect<F: StoreFactory + ?Sized>(
        factory: &F,
        descriptor: &ConnectionDescriptor,
        key: impl Into<String>,
        channel: impl Into<String>,
        decoder: Decoder<T>,
    ) -> Result<Self, SourceError> {
        let key = key.into();
        let channel = channel.into();
        validate(&key, &channel)?;

        info!("Connecting to {descriptor}");
        let handle = factory.connect(descriptor).await?;
        Self::start(handle, key, channel, decoder).await
    }

    /// Start a source on an already connected store handle.
    ///
    /// Performs the initial load, then registers the channel subscription.
    /// The load never fails construction; see the type-level docs.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::InvalidConfiguration`] for an empty key or
    /// channel, and [`SourceError::Store`] when the subscription cannot be
    /// registered.
    #[instrument(skip_all)]
    pub async fn start(
        handle: Arc<dyn StoreHandle>,
        key: impl Into<String>,
        channel: impl Into<String>,
        decoder: Decoder<T>,
    ) -> Result<Self, SourceError> {
        let key = key.into();
        let channel = channel.into();
        validate(&key, &channel)?;

        let property = Property::new(None);
        load_initial(handle.as_ref(), &key, &decoder, &property).await;

        let stream = handle.subscribe(&channel).await?;
        let dispatch = tokio::spawn(dispatch(stream, channel.clone(), decoder, property.clone()));
        info!("Live source subscribed to channel {channel} for key {key}");

        Ok(Self {
            handle,
            property,
            key,
            dispatch: Arc::new(Mutex::new(Some(dispatch))),
            closed: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Get the current decoded value.
    ///
    /// Returns `None` until the first successful decode, whether that came
    /// from the initial load or from a published message. Never blocks.
    pub fn get(&self) -> Option<T> {
        self.property.get()
    }

    /// Watch the value for changes.
    ///
    /// The stream immediately yields the current value, then yields on every
    /// replacement.
    pub fn watch(&self) -> impl Stream<Item = Option<T>> + Send {
        self.property.watch()
    }

    /// The underlying property, for observer registration elsewhere.
    pub fn property(&self) -> &Property<Option<T>> {
        &self.property
    }

    /// Point read of the raw stored value, bypassing the in-memory copy.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Closed`] once the source has been closed and
    /// [`SourceError::Store`] when the read itself fails.
    pub async fn read_source(&self) -> Result<Option<String>, SourceError> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(SourceError::Closed);
        }
        Ok(self.handle.get(&self.key).await?)
    }

    /// Stop the subscription and release the store connection.
    ///
    /// Idempotent: the connection is released exactly once, and later calls
    /// are no-ops. Teardown failures are logged, never propagated.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        if let Some(task) = self.dispatch.lock().await.take() {
            task.abort();
        }
        if let Err(e) = self.handle.close().await {
            warn!("Error while releasing store connection: {e}");
        }
        info!("Live source for key {} closed", self.key);
    }
}

fn validate(key: &str, channel: &str) -> Result<(), SourceError> {
    if key.is_empty() {
        return Err(SourceError::InvalidConfiguration(
            "key must not be empty".into(),
        ));
    }
    if channel.is_empty() {
        return Err(SourceError::InvalidConfiguration(
            "channel must not be empty".into(),
        ));
    }
    Ok(())
}

/// Best-effort read of the current stored value into the property.
///
/// Absent values, decode failures, and store errors all degrade to a warning
/// with the property left unchanged.
async fn load_initial<T: Clone + Send + Sync + 'static>(
    handle: &dyn StoreHandle,
    key: &str,
    decoder: &Decoder<T>,
    property: &Property<Option<T>>,
) {
    match handle.get(key).await {
        Ok(Some(raw)) => match decoder(&raw) {
            Ok(value) => property.set(Some(value)),
            Err(e) => warn!("Initial value for key {key} failed to decode: {e}"),
        },
        Ok(None) => {
            warn!("Initial value for key {key} is absent, waiting for the first publish");
        }
        Err(e) => warn!("Error when loading initial value for key {key}: {e}"),
    }
}

/// Per-message loop run on the spawned dispatch task.
///
/// Messages are handled in receipt order. A payload the decoder rejects is
/// skipped, keeping the previous value and the subscription alive.
async fn dispatch<T: Clone + Send + Sync + 'static>(
    mut stream: MessageStream,
    channel: String,
    decoder: Decoder<T>,
    property: Property<Option<T>>,
) {
    while let Some(message) = stream.next().await {
        debug!("New value received on channel {}", message.channel);
        match decoder(&message.payload) {
            Ok(value) => property.set(Some(value)),
            Err(e) => warn!("Discarding malformed payload on channel {channel}: {e}"),
        }
    }
    debug!("Subscription stream for channel {channel} ended");
}
