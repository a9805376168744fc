//! Error types for the TACT client, with stable integer codes matching the
//! configuration surface's `error` output field.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("invalid region: {0}")]
    InvalidRegion(String),

    #[error("file not found: {0}")]
    FileNotFound(String),

    #[error("working buffer too small")]
    WorkingBufferTooSmall,

    #[error("HTTP request timed out")]
    HttpTimeout,

    #[error("HTTP server error")]
    HttpServerError,

    #[error(transparent)]
    Bpsv(#[from] ngdp_bpsv::Error),

    #[error(transparent)]
    Manifest(#[from] ngdp_manifest::Error),

    #[error(transparent)]
    Key(#[from] ngdp_key::Error),

    #[error(transparent)]
    Transport(#[from] ngdp_cdn::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    /// The stable integer code named by the configuration surface's `error`
    /// output field.
    pub fn code(&self) -> i32 {
        match self {
            Self::InvalidConfiguration(_) | Self::InvalidRegion(_) => 1,
            Self::FileNotFound(_) => 2,
            Self::WorkingBufferTooSmall => 3,
            Self::HttpTimeout => 4,
            Self::HttpServerError => 5,
            Self::Bpsv(_) | Self::Manifest(_) | Self::Key(_) | Self::Transport(_) | Self::Io(_) => 1,
        }
    }
}
