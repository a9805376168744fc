//! Error types for CDN-config/build-config parsing

use thiserror::Error;

/// Result type for manifest parsing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing a CDN-config or build-config record
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A content key hex string did not decode to the right length
    #[error("invalid content key in field '{field}': {source}")]
    InvalidKey {
        field: &'static str,
        #[source]
        source: ngdp_key::Error,
    },

    /// `encoding`/`encoding-size` did not have exactly two space-separated
    /// tokens
    #[error("field '{field}' requires exactly two space-separated tokens, got {actual}")]
    EncodingArity { field: &'static str, actual: usize },

    /// An integer-valued field failed to parse as base-10
    #[error("invalid integer in field '{field}': {value}")]
    InvalidInteger { field: &'static str, value: String },
}
