//! Allocator façade
//!
//! All buffer growth routes through an injected [`BufferAllocator`] so a
//! caller can supply a custom heap (arena, pool, tracked allocator) instead
//! of the process-wide global allocator.

/// Uniform indirection over allocate/zeroed-allocate/grow.
///
/// A client either uses [`SystemAllocator`] throughout or supplies its own
/// implementation end to end; there is no partial-override path.
pub trait BufferAllocator: Send + Sync {
    /// Allocate `size` uninitialized bytes of capacity.
    fn allocate(&self, size: usize) -> Vec<u8>;

    /// Allocate `size` zeroed bytes of capacity.
    fn allocate_zeroed(&self, size: usize) -> Vec<u8> {
        vec![0u8; size]
    }

    /// Grow `buf`'s capacity to at least `new_capacity`, preserving its
    /// existing contents.
    fn grow(&self, mut buf: Vec<u8>, new_capacity: usize) -> Vec<u8> {
        if let Some(additional) = new_capacity.checked_sub(buf.capacity()) {
            buf.reserve(additional);
        }
        buf
    }
}

/// Default allocator backed by the global Rust allocator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

impl BufferAllocator for SystemAllocator {
    fn allocate(&self, size: usize) -> Vec<u8> {
        Vec::with_capacity(size)
    }
}
