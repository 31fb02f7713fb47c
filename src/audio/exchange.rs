//! Lock-guarded hand-off of captured samples from the audio callback to the
//! display thread.
//!
//! Two independent mutexes guard the short (latest block) buffer and the
//! rolling long buffer, so a producer write to one never blocks a reader of
//! the other. Both buffers are allocated once at construction; critical
//! sections are plain memory copies.

use std::sync::{Mutex, MutexGuard};

use crate::error::{ScopeError, ScopeResult};

/// Fixed-capacity buffer holding the most recently published block
#[derive(Debug)]
struct BlockBuffer {
    data: Vec<f32>,
    len: usize,
}

impl BlockBuffer {
    fn new(data: Vec<f32>) -> Self {
        Self { data, len: 0 }
    }

    fn write(&mut self, samples: &[f32]) {
        let n = samples.len().min(self.data.len());
        self.data[..n].copy_from_slice(&samples[..n]);
        self.len = n;
    }

    fn valid(&self) -> &[f32] {
        &self.data[..self.len]
    }
}

/// Fixed-capacity FIFO window; once full, the oldest samples are evicted
#[derive(Debug)]
struct RollingBuffer {
    data: Vec<f32>,
    len: usize,
}

impl RollingBuffer {
    fn new(data: Vec<f32>) -> Self {
        Self { data, len: 0 }
    }

    fn append(&mut self, samples: &[f32]) {
        let cap = self.data.len();
        let n = samples.len();

        if n >= cap {
            self.data.copy_from_slice(&samples[n - cap..]);
            self.len = cap;
        } else if self.len + n <= cap {
            self.data[self.len..self.len + n].copy_from_slice(samples);
            self.len += n;
        } else {
            // Keep the newest (cap - n) samples, then append
            let keep = cap - n;
            self.data.copy_within(self.len - keep..self.len, 0);
            self.data[keep..].copy_from_slice(samples);
            self.len = cap;
        }
    }

    fn valid(&self) -> &[f32] {
        &self.data[..self.len]
    }
}

/// Thread-safe exchange between one real-time producer and one consumer
#[derive(Debug)]
pub struct SampleBufferExchange {
    current: Mutex<BlockBuffer>,
    long: Mutex<RollingBuffer>,
    capacity: usize,
    long_capacity: usize,
}

/// A poisoned lock means the other side panicked mid-copy; there is no
/// consistent buffer left to hand out.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex
        .lock()
        .expect("sample exchange lock poisoned (resource exhaustion)")
}

fn zeroed(len: usize) -> ScopeResult<Vec<f32>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len).map_err(|e| {
        ScopeError::ResourceExhaustion(format!("Cannot allocate {} samples: {}", len, e))
    })?;
    data.resize(len, 0.0);
    Ok(data)
}

impl SampleBufferExchange {
    /// Allocate both buffers up front
    ///
    /// # Arguments
    /// * `capacity` - Short buffer capacity (samples per published block)
    /// * `long_capacity` - Rolling buffer capacity (e.g. `sample_rate * seconds`)
    pub fn new(capacity: usize, long_capacity: usize) -> Self {
        Self::from_storage(vec![0.0; capacity], vec![0.0; long_capacity])
    }

    /// Like [`SampleBufferExchange::new`], reporting allocation failure
    /// instead of aborting
    pub fn try_new(capacity: usize, long_capacity: usize) -> ScopeResult<Self> {
        Ok(Self::from_storage(zeroed(capacity)?, zeroed(long_capacity)?))
    }

    fn from_storage(current: Vec<f32>, long: Vec<f32>) -> Self {
        let (capacity, long_capacity) = (current.len(), long.len());
        Self {
            current: Mutex::new(BlockBuffer::new(current)),
            long: Mutex::new(RollingBuffer::new(long)),
            capacity,
            long_capacity,
        }
    }

    /// Publish one block from the producer
    ///
    /// The short buffer receives at most `capacity` samples; the rolling
    /// buffer receives the whole block, evicting its oldest samples.
    pub fn publish(&self, samples: &[f32]) {
        lock(&self.current).write(samples);
        lock(&self.long).append(samples);
    }

    /// Copy the latest block into `out`, returning its length
    pub fn read_current(&self, out: &mut Vec<f32>) -> usize {
        out.clear();
        out.reserve(self.capacity);
        let guard = lock(&self.current);
        out.extend_from_slice(guard.valid());
        guard.len
    }

    /// Copy the rolling buffer (oldest first) into `out`, returning its length
    pub fn read_long(&self, out: &mut Vec<f32>) -> usize {
        out.clear();
        out.reserve(self.long_capacity);
        let guard = lock(&self.long);
        out.extend_from_slice(guard.valid());
        guard.len
    }

    /// Snapshot of the latest block
    pub fn current_snapshot(&self) -> Vec<f32> {
        let mut out = Vec::new();
        self.read_current(&mut out);
        out
    }

    /// Snapshot of the rolling buffer
    pub fn long_snapshot(&self) -> Vec<f32> {
        let mut out = Vec::new();
        self.read_long(&mut out);
        out
    }

    /// Valid length of the latest block
    pub fn len(&self) -> usize {
        lock(&self.current).len
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Valid length of the rolling buffer (grows until full)
    pub fn long_len(&self) -> usize {
        lock(&self.long).len
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn long_capacity(&self) -> usize {
        self.long_capacity
    }
}
