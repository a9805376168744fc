//! Error types for the download transport adapter

use thiserror::Error;

/// Result type for transport construction
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building a [`crate::HttpTransport`].
///
/// Errors encountered while performing a download are not modeled as
/// `Err` values; they are reported through
/// [`crate::DownloadStatus`] instead, per the transport contract.
#[derive(Error, Debug)]
pub enum Error {
    /// The underlying HTTP client failed to construct
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}
