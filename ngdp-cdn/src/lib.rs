//! # ngdp-cdn
//!
//! The download transport adapter: a single-method contract covering
//! HEAD/size-only, library-allocated, and caller-sized fixed-buffer
//! downloads, with a `reqwest`-backed default implementation.

pub mod error;
pub mod http_transport;
pub mod transport;

pub use error::{Error, Result};
pub use http_transport::HttpTransport;
pub use transport::{ByteRange, DownloadBuffer, DownloadOutcome, DownloadStatus, Transport};
