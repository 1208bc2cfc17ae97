use crate::store::StoreError;

/// Errors that can occur while constructing or using a live source
#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    /// Key or channel rejected at construction time
    #[error("Invalid source configuration: {0}")]
    InvalidConfiguration(String),

    /// Store-level failure surfaced through the handle seam
    #[error("Store operation failed: {0}")]
    Store(#[from] StoreError),

    /// Operation on a source whose connection was already released
    #[error("Source already closed")]
    Closed,
}
