//! View-state error types.

use thiserror::Error;

/// Errors surfaced by view-state operations and handler logic.
#[derive(Debug, Error)]
pub enum ViewError {
    /// An error occurred in the backing store.
    #[error("Store error: {0}")]
    Store(#[from] storage::StoreError),

    /// A handler-specific failure.
    #[error("Handler error: {0}")]
    Handler(String),
}

/// Result type for view-state operations.
pub type Result<T> = std::result::Result<T, ViewError>;
