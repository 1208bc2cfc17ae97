//! Rivulet - live, read-only configuration sourced from a key/value store.
//!
//! A [`LiveSource`] loads a named value from a remote key/value store once at
//! startup, then keeps an in-memory [`Property`] synchronized by subscribing
//! to a pub/sub channel on the same store. Applications read the current
//! decoded value at any time without touching the network; updates arrive as
//! pushes, not polls.
//!
//! The backing store is reached through the [`store::StoreHandle`] trait, so
//! any system offering keyed reads plus channel subscriptions can back a
//! source. An in-process [`store::MemoryStore`] is included for local
//! development and tests.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use rivulet::{LiveSource, decode, store::{MemoryStore, StoreHandle}};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), rivulet::SourceError> {
//! let store = MemoryStore::new();
//! store.set("flow-rules", r#"[{"resource":"foo","count":10}]"#).await;
//!
//! let handle: Arc<dyn StoreHandle> = Arc::new(store);
//! let source = LiveSource::start(
//!     handle,
//!     "flow-rules",
//!     "flow-rules-channel",
//!     decode::json::<Vec<serde_json::Value>>(),
//! )
//! .await?;
//!
//! let rules = source.get();
//! println!("current rules: {rules:?}");
//! # Ok(())
//! # }
//! ```
//!
//! # Consistency
//!
//! The property always holds the last successfully decoded value, whether it
//! came from the initial load or from a published message. The store's `set`
//! and `publish` operations are not coordinated by this crate; a producer
//! that wants subscribers and late readers to agree must issue both
//! atomically (for example inside a transaction on the backing store).

/// Caller-supplied payload decoders.
pub mod decode;

/// Connection descriptors and their validating builder.
pub mod descriptor;

/// Reactive single-slot value holder.
pub mod property;

/// The sync engine binding a property to a store key and channel.
pub mod source;

/// Store handle seam and the in-memory implementation.
pub mod store;

pub use descriptor::{ConnectionDescriptor, DescriptorError, Endpoint, Topology};
pub use property::Property;
pub use source::{LiveSource, SourceError};
