use thiserror::Error;

/// Errors that can occur when interacting with a view store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backend was used before its connection was initialized.
    #[error("Storage backend not initialized")]
    NotInitialized,

    /// A value or event could not be encoded or decoded.
    #[error("Codec error: {0}")]
    Codec(#[from] codec::CodecError),

    /// A transport or store failure, reason passed through opaquely.
    #[error("Backend error: {0}")]
    Backend(String),
}

impl From<::redis::RedisError> for StoreError {
    fn from(err: ::redis::RedisError) -> Self {
        Self::Backend(err.to_string())
    }
}

/// Result type for view store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
