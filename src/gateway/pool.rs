//! Lock-free pool of reusable scratch buffers for per-request decryption
//! output, avoiding one allocation per request on the hot path.

use std::sync::Arc;

use crossbeam_queue::ArrayQueue;

/// A pool of empty `Vec<u8>`s, each pre-reserved to `buffer_capacity`
/// bytes. `acquire` hands out an empty, zero-length buffer with spare
/// capacity; `release` clears and returns it.
///
/// Cheap to clone - all clones share the same underlying queue via `Arc`.
#[derive(Clone)]
pub struct BufferPool {
    pool: Arc<ArrayQueue<Vec<u8>>>,
    buffer_capacity: usize,
}

impl BufferPool {
    /// Builds a pool of `pool_size` buffers, each with `buffer_capacity`
    /// bytes of pre-reserved (but unfilled) capacity.
    pub fn new(buffer_capacity: usize, pool_size: usize) -> Self {
        let pool = ArrayQueue::new(pool_size);
        for _ in 0..pool_size {
            let _ = pool.push(Vec::with_capacity(buffer_capacity));
        }

        BufferPool {
            pool: Arc::new(pool),
            buffer_capacity,
        }
    }

    /// Takes a buffer from the pool, allocating a fresh one if the pool is
    /// currently empty.
    pub fn acquire(&self) -> Vec<u8> {
        self.pool.pop().unwrap_or_else(|| Vec::with_capacity(self.buffer_capacity))
    }

    /// Clears `buf` and returns it to the pool. Dropped silently if the
    /// pool is already at capacity.
    pub fn release(&self, mut buf: Vec<u8>) {
        buf.clear();
        let _ = self.pool.push(buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquired_buffer_is_empty() {
        let pool = BufferPool::new(4096, 4);
        let buf = pool.acquire();
        assert!(buf.is_empty());
    }

    #[test]
    fn released_buffer_is_reused() {
        let pool = BufferPool::new(4096, 1);
        let mut buf = pool.acquire();
        buf.extend_from_slice(b"leftover");
        pool.release(buf);

        let reused = pool.acquire();
        assert!(reused.is_empty());
    }

    #[test]
    fn exhausted_pool_allocates_on_demand() {
        let pool = BufferPool::new(4096, 1);
        let _held = pool.acquire();
        let fresh = pool.acquire();
        assert!(fresh.is_empty());
    }

    #[test]
    fn clone_shares_the_same_underlying_queue() {
        let pool = BufferPool::new(64, 1);
        let clone = pool.clone();
        clone.release(vec![1, 2, 3]);
        let buf = pool.acquire();
        assert!(buf.is_empty());
    }
}
