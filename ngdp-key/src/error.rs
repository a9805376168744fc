//! Error types for content key decoding

use thiserror::Error;

/// Result type for content key operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while decoding a content key
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The hex string was not exactly 32 characters (16 bytes)
    #[error("content key hex string must be 32 characters, got {len}")]
    InvalidLength { len: usize },
}
