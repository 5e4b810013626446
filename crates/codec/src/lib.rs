//! JSON codec between application values and stored bytes.
//!
//! Everything a handler can produce goes through this codec: view values,
//! the `{key, value}` envelopes the backend stores them in, and events
//! themselves (so the per-key log uses the same wire format). Decode
//! failures are reported to the caller, never substituted with a default.

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

/// Errors that can occur converting values to or from stored bytes.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The value could not be serialized.
    #[error("Encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// The stored bytes could not be deserialized.
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),
}

/// Result type for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Encodes a value into its stored byte representation.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
    serde_json::to_vec(value).map_err(CodecError::Encode)
}

/// Decodes a value from its stored byte representation.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(CodecError::Decode)
}
