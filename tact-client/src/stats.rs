//! Statistics façade: a typed numeric event fired around download attempts.
//!
//! The vocabulary and integer codes are frozen by the configuration
//! surface; consumers match on `StatEvent` rather than the raw code.

use ngdp_key::ContentKey;

/// `(type, arg0, arg1, arg2, optional 16-byte key)` event, with the
/// event-specific meaning of `arg0..arg2` documented per variant used by
/// [`crate::coordinator::RemoteCoordinator`]:
///
/// - `DownloadStarted` / `DownloadRetry`: `arg0` = elapsed microseconds
///   since the first attempt, `arg1` = attempt ordinal (1-based).
/// - `DownloadFinished`: `arg0` = final host index, `arg1` = byte count,
///   `arg2` = total elapsed microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum StatEvent {
    DownloadStarted = 1,
    DownloadFinished = 2,
    DownloadRetry = 3,
    Patching = 4,
    CascReadStarted = 5,
    CascReadFinished = 6,
}

impl StatEvent {
    pub fn code(self) -> i32 {
        self as i32
    }
}

pub trait StatsSink: Send + Sync {
    fn record(&self, event: StatEvent, arg0: i64, arg1: i64, arg2: i64, key: Option<ContentKey>);
}

/// Default sink: forwards to `tracing` at debug level.
#[derive(Debug, Default)]
pub struct TracingStatsSink;

impl StatsSink for TracingStatsSink {
    fn record(&self, event: StatEvent, arg0: i64, arg1: i64, arg2: i64, key: Option<ContentKey>) {
        tracing::debug!(
            target: "tact_client::stats",
            code = event.code(),
            arg0,
            arg1,
            arg2,
            key = ?key.map(|k| k.url_fragment()),
            "stat event"
        );
    }
}
