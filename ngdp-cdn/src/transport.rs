//! Download transport contract
//!
//! A single method covers all three buffer modes the remote coordinator
//! needs: HEAD/size-only, library-allocated, and caller-sized fixed.

use async_trait::async_trait;

/// Outcome of a single download attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadStatus {
    Success,
    RetryableServerError,
    NonRetryable4xx,
    BufferTooSmall,
}

/// How the caller wants the response body delivered.
pub enum DownloadBuffer<'a> {
    /// HEAD request: no body is stored, only the size is reported.
    None,
    /// Allocated mode: the transport grows its own buffer as the body
    /// streams in.
    Allocate,
    /// Fixed-buffer mode: the transport writes up to `buffer.len()` bytes
    /// into the caller's buffer, truncating (and reporting
    /// [`DownloadStatus::BufferTooSmall`]) if the body is larger.
    Fixed(&'a mut [u8]),
}

/// Result of a [`Transport::download`] call.
#[derive(Debug, Default)]
pub struct DownloadOutcome {
    pub status: Option<DownloadStatus>,
    /// Content-Length (or the actual body length) as reported by the
    /// server.
    pub size: u64,
    /// The downloaded body, present only in allocated mode on success.
    pub allocated: Option<Vec<u8>>,
    /// Number of bytes actually written into the caller's buffer, present
    /// only in fixed-buffer mode.
    pub written: usize,
}

impl DownloadOutcome {
    pub fn status(&self) -> DownloadStatus {
        self.status.unwrap_or(DownloadStatus::RetryableServerError)
    }
}

/// A byte range `(start, end)` with `end` exclusive; the transport issues
/// `Range: bytes={start}-{end - 1}`.
pub type ByteRange = (u64, u64);

/// Contract for downloading content-addressed blobs over HTTP (or a test
/// double).
#[async_trait]
pub trait Transport: Send + Sync {
    /// Download `url`, optionally within `range`, delivering the body per
    /// `buffer`.
    async fn download(
        &self,
        url: &str,
        range: Option<ByteRange>,
        buffer: DownloadBuffer<'_>,
    ) -> DownloadOutcome;
}
