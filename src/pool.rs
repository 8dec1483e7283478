//! Reusable byte buffers for request and response encoding
//!
//! A [`BufferPool`] hands out [`PooledBuffer`] guards. The buffer is cleared
//! before it is handed out and goes back to the pool when the guard drops,
//! so every exit path of a call releases it.

use std::ops::{Deref, DerefMut};
use std::sync::{Arc, Mutex};

pub(crate) const DEFAULT_POOL_CAPACITY: usize = 16;

/// Buffers that grew past this size are dropped instead of being retained.
const MAX_RETAINED_BYTES: usize = 4 * 1024 * 1024;

/// Thread-safe pool of byte buffers.
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
}

struct PoolInner {
    buffers: Mutex<Vec<Vec<u8>>>,
    capacity: usize,
    initial_size: usize,
}

impl std::fmt::Debug for BufferPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferPool")
            .field("capacity", &self.inner.capacity)
            .field("idle", &self.idle())
            .finish()
    }
}

impl BufferPool {
    /// Create a pool retaining at most `capacity` idle buffers, each
    /// pre-allocated with `initial_size` bytes.
    pub fn new(capacity: usize, initial_size: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                buffers: Mutex::new(Vec::with_capacity(capacity)),
                capacity,
                initial_size,
            }),
        }
    }

    /// Take an empty buffer from the pool, allocating one if none is idle.
    pub fn acquire(&self) -> PooledBuffer {
        let buffer = self
            .lock()
            .pop()
            .unwrap_or_else(|| Vec::with_capacity(self.inner.initial_size));

        let mut guard = PooledBuffer {
            buffer,
            pool: self.clone(),
        };
        guard.buffer.clear();
        guard
    }

    /// Number of idle buffers currently retained.
    pub fn idle(&self) -> usize {
        self.lock().len()
    }

    fn release(&self, mut buffer: Vec<u8>) {
        if buffer.capacity() > MAX_RETAINED_BYTES {
            return;
        }
        buffer.clear();

        let mut buffers = self.lock();
        if buffers.len() < self.inner.capacity {
            buffers.push(buffer);
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Vec<u8>>> {
        // A panic while holding the lock cannot leave a buffer half-written
        // in the pool, so a poisoned lock is still usable.
        self.inner
            .buffers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// A buffer borrowed from a [`BufferPool`]; returned on drop.
pub struct PooledBuffer {
    buffer: Vec<u8>,
    pool: BufferPool,
}

impl Deref for PooledBuffer {
    type Target = Vec<u8>;

    fn deref(&self) -> &Vec<u8> {
        &self.buffer
    }
}

impl DerefMut for PooledBuffer {
    fn deref_mut(&mut self) -> &mut Vec<u8> {
        &mut self.buffer
    }
}

impl Drop for PooledBuffer {
    fn drop(&mut self) {
        let buffer = std::mem::take(&mut self.buffer);
        self.pool.release(buffer);
    }
}
