/// Errors that can occur during store operations
#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    /// The store could not be reached
    #[error("Store connection failed: {0}")]
    ConnectionFailed(String),

    /// A point read failed
    #[error("Store read failed: {0}")]
    ReadFailed(String),

    /// A channel subscription could not be registered
    #[error("Subscription to channel {channel} failed: {reason}")]
    SubscribeFailed {
        /// Channel the subscription targeted
        channel: String,
        /// Store-reported reason
        reason: String,
    },

    /// Operation attempted on a released connection
    #[error("Store connection already released")]
    ConnectionReleased,

    /// Any other store-reported failure
    #[error("Store operation failed: {0}")]
    OperationFailed(String),
}
