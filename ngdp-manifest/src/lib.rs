//! # ngdp-manifest
//!
//! Parsers for the two line/equals text manifests that a content
//! distribution protocol client consumes once it has located a CDN and a
//! build: the CDN-config record (archive lists) and the build-config
//! record (root/install/download/encoding keys).

pub mod build_config;
pub mod cdn_config;
pub mod error;
pub mod line_parser;

pub use build_config::BuildConfig;
pub use cdn_config::CdnConfig;
pub use error::{Error, Result};
