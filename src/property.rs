use std::fmt::Debug;

use futures::stream::Stream;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

/// A single mutable slot readable from any thread and replaced atomically.
///
/// The slot holds the most recently set value. Readers never block and never
/// observe a partially written value; watchers are notified on every
/// replacement. When writers race, the last replacement in real time wins —
/// no reordering is attempted.
#[derive(Clone)]
pub struct Property<T: Clone + Send + Sync + 'static> {
    tx: watch::Sender<T>,
    rx: watch::Receiver<T>,
}

impl<T: Clone + Send + Sync + 'static> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(initial: T) -> Self {
        let (tx, rx) = watch::channel(initial);
        Self { tx, rx }
    }

    /// Atomically replace the current value and notify all watchers.
    ///
    /// Visible to every subsequent [`get`](Self::get) on any thread without
    /// further synchronization by the caller.
    pub fn set(&self, new_value: T) {
        let _ = self.tx.send_replace(new_value);
    }

    /// Get the current value.
    ///
    /// This is a synchronous operation that clones the current value.
    pub fn get(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Watch for changes to this property.
    ///
    /// The stream immediately yields the current value, then yields on
    /// every subsequent replacement.
    pub fn watch(&self) -> impl Stream<Item = T> + Send {
        WatchStream::new(self.rx.clone())
    }
}

impl<T: Clone + Send + Sync + Debug + 'static> Debug for Property<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[test]
    fn set_is_visible_through_clones() {
        let property = Property::new(0u32);
        let reader = property.clone();

        property.set(7);

        assert_eq!(reader.get(), 7);
    }

    #[tokio::test]
    async fn watch_yields_current_value_then_updates() {
        let property = Property::new(String::from("a"));
        let mut updates = Box::pin(property.watch());

        assert_eq!(updates.next().await.as_deref(), Some("a"));

        property.set(String::from("b"));
        assert_eq!(updates.next().await.as_deref(), Some("b"));
    }

    #[test]
    fn replacement_with_equal_value_still_wins() {
        let property = Property::new(Some(1));
        property.set(Some(1));
        property.set(None);

        assert_eq!(property.get(), None);
    }
}
