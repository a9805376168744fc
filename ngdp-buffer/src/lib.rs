//! # ngdp-buffer
//!
//! The growable byte buffer, view, string builder, and segment substrate
//! that the rest of this workspace's parsers and coordinator build on.
//!
//! - [`Buffer`] is a growable byte container with empty, heap, or
//!   caller-supplied inline storage modes, growing by
//!   `max(size + n, ceil(1.5 * capacity))` with a floor of 8.
//! - [`View`] is a non-owning byte slice with search/split/trim/parse.
//! - [`Segment`] defers view construction until a buffer stops growing.
//! - [`StringBuilder`] incrementally builds a byte string in a [`Buffer`].

pub mod allocator;
pub mod buffer;
pub mod error;
pub mod segment;
pub mod string_builder;
pub mod view;

pub use allocator::{BufferAllocator, SystemAllocator};
pub use buffer::Buffer;
pub use error::{Error, Result};
pub use segment::Segment;
pub use string_builder::StringBuilder;
pub use view::View;
