//! Memory allocator trait and scoped device buffers
//!
//! The solvers never allocate on their own. The API shell asks the client's
//! allocator for the planned workspace and holds every region in a
//! [`DeviceBuffer`], so memory goes back on every exit path.

use crate::error::Result;

/// Memory allocator trait for runtime backends
pub trait Allocator: Clone + Send + Sync {
    /// Allocate memory of given size
    ///
    /// Returns a device address, or the null address for `size_bytes == 0`.
    /// Fails with [`Error::OutOfMemory`](crate::error::Error::OutOfMemory) when the
    /// request cannot be satisfied.
    fn allocate(&self, size_bytes: usize) -> Result<u64>;

    /// Deallocate memory
    fn deallocate(&self, ptr: u64, size_bytes: usize);

    /// Get the total allocated bytes
    fn allocated_bytes(&self) -> usize {
        0 // Default: tracking not supported
    }
}

/// Device allocation released on drop
#[derive(Debug)]
pub struct DeviceBuffer<'a, A: Allocator> {
    allocator: &'a A,
    ptr: u64,
    size_bytes: usize,
}

impl<'a, A: Allocator> DeviceBuffer<'a, A> {
    /// Allocate `size_bytes` from `allocator`
    pub fn new(allocator: &'a A, size_bytes: usize) -> Result<Self> {
        let ptr = allocator.allocate(size_bytes)?;
        Ok(Self {
            allocator,
            ptr,
            size_bytes,
        })
    }

    /// Device address (null for an empty buffer)
    #[inline]
    pub fn ptr(&self) -> u64 {
        self.ptr
    }

    /// Size in bytes
    #[inline]
    pub fn len(&self) -> usize {
        self.size_bytes
    }

    /// Whether the buffer holds no memory
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size_bytes == 0
    }
}

impl<A: Allocator> Drop for DeviceBuffer<'_, A> {
    fn drop(&mut self) {
        if self.size_bytes != 0 {
            self.allocator.deallocate(self.ptr, self.size_bytes);
        }
    }
}
