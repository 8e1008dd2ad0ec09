//! CPU client and allocator implementation

use super::device::CpuDevice;
use super::runtime::{heap_allocate, heap_deallocate, CpuRuntime};
use crate::error::{Error, Result};
use crate::runtime::{Allocator, RuntimeClient};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Lanes handed to one rayon task at minimum
const DEFAULT_MIN_LANES: usize = 4;

/// CPU client for operation dispatch
///
/// Lane kernels run on rayon when the `rayon` feature is enabled, on the global
/// pool or on a dedicated pool built by [`CpuClient::with_threads`].
#[derive(Clone, Debug)]
pub struct CpuClient {
    pub(crate) device: CpuDevice,
    allocator: CpuAllocator,
    parallel: bool,
    min_lanes: usize,
    #[cfg(feature = "rayon")]
    pool: Option<Arc<rayon::ThreadPool>>,
}

impl CpuClient {
    /// Create a new CPU client
    pub fn new(device: CpuDevice) -> Self {
        Self {
            device,
            allocator: CpuAllocator::default(),
            parallel: cfg!(feature = "rayon"),
            min_lanes: DEFAULT_MIN_LANES,
            #[cfg(feature = "rayon")]
            pool: None,
        }
    }

    /// Cap the bytes this client's allocator hands out at once
    ///
    /// Requests that would exceed the cap fail with `OutOfMemory`.
    pub fn with_memory_limit(mut self, limit_bytes: usize) -> Self {
        self.allocator = CpuAllocator::with_limit(limit_bytes);
        self
    }

    /// Enable or disable parallel lanes
    pub fn with_parallelism(mut self, enabled: bool) -> Self {
        self.parallel = enabled && cfg!(feature = "rayon");
        self
    }

    /// Minimum number of lanes per rayon task
    pub fn with_min_lanes(mut self, min_lanes: usize) -> Self {
        self.min_lanes = min_lanes.max(1);
        self
    }

    /// Run lanes on a dedicated pool of `threads` workers
    ///
    /// Falls back to the global pool when the pool cannot be built.
    #[cfg(feature = "rayon")]
    pub fn with_threads(mut self, threads: usize) -> Self {
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => self.pool = Some(Arc::new(pool)),
            Err(e) => log::warn!("cpu client: cannot build a {threads}-thread pool ({e}), using the global pool"),
        }
        self
    }

    /// Minimum lanes per task when splitting a launch
    #[inline]
    pub fn rayon_min_len(&self) -> usize {
        self.min_lanes
    }

    #[cfg(feature = "rayon")]
    fn install_parallelism<OP>(&self, op: OP)
    where
        OP: FnOnce() + Send,
    {
        match &self.pool {
            Some(pool) => pool.install(op),
            None => op(),
        }
    }
}

impl RuntimeClient<CpuRuntime> for CpuClient {
    fn device(&self) -> &CpuDevice {
        &self.device
    }

    fn synchronize(&self) {
        // Launches complete before they return
    }

    fn allocator(&self) -> &CpuAllocator {
        &self.allocator
    }

    fn launch<F>(&self, lanes: usize, kernel: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        #[cfg(feature = "rayon")]
        if self.parallel && lanes > 1 {
            use rayon::prelude::*;

            let min_len = self.rayon_min_len();
            self.install_parallelism(|| {
                (0..lanes)
                    .into_par_iter()
                    .with_min_len(min_len)
                    .for_each(&kernel);
            });
            return;
        }

        for lane in 0..lanes {
            kernel(lane);
        }
    }
}

/// Heap allocator with live-byte accounting and an optional cap
#[derive(Clone, Debug, Default)]
pub struct CpuAllocator {
    limit: Option<usize>,
    allocated: Arc<AtomicUsize>,
}

impl CpuAllocator {
    /// Allocator refusing to hold more than `limit_bytes` at once
    pub fn with_limit(limit_bytes: usize) -> Self {
        Self {
            limit: Some(limit_bytes),
            allocated: Arc::default(),
        }
    }

    fn reserve(&self, size_bytes: usize) -> Result<()> {
        let limit = self.limit.unwrap_or(usize::MAX);
        self.allocated
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |live| {
                live.checked_add(size_bytes).filter(|&total| total <= limit)
            })
            .map(|_| ())
            .map_err(|_| Error::OutOfMemory { size: size_bytes })
    }
}

impl Allocator for CpuAllocator {
    fn allocate(&self, size_bytes: usize) -> Result<u64> {
        if size_bytes == 0 {
            return Ok(0);
        }

        self.reserve(size_bytes)?;
        heap_allocate(size_bytes).inspect_err(|_| {
            self.allocated.fetch_sub(size_bytes, Ordering::AcqRel);
        })
    }

    fn deallocate(&self, ptr: u64, size_bytes: usize) {
        if ptr == 0 || size_bytes == 0 {
            return;
        }

        heap_deallocate(ptr, size_bytes);
        self.allocated.fetch_sub(size_bytes, Ordering::AcqRel);
    }

    fn allocated_bytes(&self) -> usize {
        self.allocated.load(Ordering::Acquire)
    }
}
