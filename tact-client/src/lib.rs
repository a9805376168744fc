//! TACT client for a content-distribution protocol: bootstrap, CDN host
//! selection, retrying content-addressed downloads, and the logging and
//! statistics façades around them.

pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod file_io;
pub mod log;
pub mod region;
pub mod resource;
pub mod stats;

pub use client::Client;
pub use config::ClientConfig;
pub use coordinator::RemoteCoordinator;
pub use error::{Error, Result};
pub use file_io::{FileIo, StdFileIo};
pub use log::{LogSink, Logger, TracingLogSink};
pub use region::Region;
pub use resource::ResourceType;
pub use stats::{StatEvent, StatsSink, TracingStatsSink};
