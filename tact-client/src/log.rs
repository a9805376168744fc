//! Logging façade: a pluggable sink fed from a fixed-size scratch buffer.
//!
//! Grounded on `ngdp_buffer::Buffer`'s inline/heap storage for the scratch
//! area, and on the client's single-threaded usage model (see the
//! concurrency notes on [`crate::coordinator::RemoteCoordinator`]): the
//! buffer is wrapped in a `RefCell`, not a mutex, because nothing in this
//! crate enters the client from more than one thread at a time. A future
//! multi-threaded client would need to upgrade this to a mutex.

use std::cell::RefCell;

use ngdp_buffer::Buffer;

const SCRATCH_CAPACITY: usize = 64 * 1024;

/// Receives already-formatted, already-truncated log messages.
pub trait LogSink: Send + Sync {
    fn log(&self, message: &str);
}

/// Default sink: forwards to `tracing` at info level.
#[derive(Debug, Default)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, message: &str) {
        tracing::info!(target: "tact_client", "{message}");
    }
}

/// Formats messages into a 64 KiB scratch buffer before handing them to the
/// configured sink, truncating anything larger.
pub struct Logger {
    sink: std::sync::Arc<dyn LogSink>,
    scratch: RefCell<Buffer<'static>>,
}

impl Logger {
    pub fn new(sink: std::sync::Arc<dyn LogSink>) -> Self {
        Self {
            sink,
            scratch: RefCell::new(Buffer::with_capacity(SCRATCH_CAPACITY)),
        }
    }

    pub fn log(&self, message: &str) {
        let mut scratch = self.scratch.borrow_mut();
        while scratch.pop().is_some() {}

        let bytes = message.as_bytes();
        let truncated = if bytes.len() > SCRATCH_CAPACITY {
            let mut end = SCRATCH_CAPACITY;
            while end > 0 && !message.is_char_boundary(end) {
                end -= 1;
            }
            &bytes[..end]
        } else {
            bytes
        };

        scratch.append(truncated);
        let rendered = std::str::from_utf8(scratch.as_slice()).unwrap_or("<non-utf8 log message>");
        self.sink.log(rendered);
    }
}
