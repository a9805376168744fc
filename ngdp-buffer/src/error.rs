//! Error types for the buffer substrate

use thiserror::Error;

/// Result type for buffer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while operating on a buffer, view, or segment
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A segment's offsets fall outside the buffer it is resolved against
    #[error("segment ({start}, {end}) out of bounds for buffer of length {len}")]
    SegmentOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },

    /// `remove_at`/`pop` called on an index that does not exist
    #[error("index {index} out of bounds for buffer of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },
}
