//! File-I/O façade: injectable stream open/seek/read/write/close.
//!
//! Declared by the configuration surface alongside the memory allocator,
//! but not exercised by the coordinator itself — the core only ever reads
//! bytes it has already downloaded into memory. A default, `std::fs`-backed
//! implementation is installed when the caller doesn't supply one, so the
//! facade is always present even though nothing in this crate calls it yet.

use std::collections::HashMap;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

pub trait FileIo: Send + Sync {
    fn open(&self, path: &str, write: bool) -> std::io::Result<u64>;
    fn seek(&self, handle: u64, offset: i64, whence: SeekFrom) -> std::io::Result<u64>;
    fn read(&self, handle: u64, buf: &mut [u8]) -> std::io::Result<usize>;
    fn write(&self, handle: u64, buf: &[u8]) -> std::io::Result<usize>;
    fn close(&self, handle: u64) -> std::io::Result<()>;
}

/// Default [`FileIo`] backed by `std::fs`, keyed by an opaque handle id.
#[derive(Default)]
pub struct StdFileIo {
    next_handle: AtomicU64,
    open_files: Mutex<HashMap<u64, File>>,
}

impl StdFileIo {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_file<T>(&self, handle: u64, f: impl FnOnce(&mut File) -> std::io::Result<T>) -> std::io::Result<T> {
        let mut files = self.open_files.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let file = files
            .get_mut(&handle)
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotFound, "unknown file handle"))?;
        f(file)
    }
}

impl FileIo for StdFileIo {
    fn open(&self, path: &str, write: bool) -> std::io::Result<u64> {
        let file = if write {
            OpenOptions::new().create(true).write(true).truncate(true).open(path)?
        } else {
            OpenOptions::new().read(true).open(path)?
        };
        let handle = self.next_handle.fetch_add(1, Ordering::Relaxed);
        self.open_files
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(handle, file);
        Ok(handle)
    }

    fn seek(&self, handle: u64, offset: i64, whence: SeekFrom) -> std::io::Result<u64> {
        let from = match whence {
            SeekFrom::Start(_) => SeekFrom::Start(offset as u64),
            SeekFrom::Current(_) => SeekFrom::Current(offset),
            SeekFrom::End(_) => SeekFrom::End(offset),
        };
        self.with_file(handle, |file| file.seek(from))
    }

    fn read(&self, handle: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        self.with_file(handle, |file| file.read(buf))
    }

    fn write(&self, handle: u64, buf: &[u8]) -> std::io::Result<usize> {
        self.with_file(handle, |file| file.write(buf))
    }

    fn close(&self, handle: u64) -> std::io::Result<()> {
        self.open_files
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .remove(&handle);
        Ok(())
    }
}
