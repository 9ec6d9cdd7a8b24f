//! Error types for the Star Registry Core.

use thiserror::Error;

/// Core errors that can occur during block and signature operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid signature")]
    InvalidSignature,

    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("encoding error: {0}")]
    EncodingError(String),

    #[error("decoding error: {0}")]
    DecodingError(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            CoreError::EncodingError(e.to_string())
        } else {
            CoreError::DecodingError(e.to_string())
        }
    }
}

/// Errors in controller-supplied registration input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("story is {len} bytes, maximum is {max}")]
    StoryTooLong { len: usize, max: usize },
}
