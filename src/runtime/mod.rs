//! Runtime backends the solvers execute on
//!
//! This module defines the `Runtime` trait the solvers are generic over and the
//! CPU implementation.
//!
//! # Architecture
//!
//! ```text
//! Runtime (backend identity, raw memory)
//! ├── Device (identifies a specific GPU/CPU)
//! ├── Client (owns the execution queue, launches lane kernels)
//! └── Allocator (fallible allocation with byte accounting)
//! ```
//!
//! Device memory is addressed by `u64` handles. A zero handle is the null address.

mod allocator;

#[cfg(feature = "cpu")]
pub mod cpu;

pub use allocator::{Allocator, DeviceBuffer};

/// Core trait for compute backends
///
/// `Runtime` abstracts over the device the matrices live on. It uses static
/// dispatch via generics.
///
/// # Example
///
/// ```
/// use numr_lapack::runtime::Runtime;
/// use numr_lapack::runtime::cpu::CpuRuntime;
///
/// let device = CpuRuntime::default_device();
/// let ptr = CpuRuntime::allocate(1024, &device).unwrap();
/// CpuRuntime::copy_to_device(&[1u8, 2, 3], ptr, &device);
/// CpuRuntime::deallocate(ptr, 1024, &device);
/// ```
pub trait Runtime: Clone + Send + Sync + 'static {
    /// Device identifier type
    type Device: Device;

    /// Client for dispatching operations
    type Client: RuntimeClient<Self>;

    /// Memory allocator type
    type Allocator: Allocator;

    /// Human-readable name of this runtime
    fn name() -> &'static str;

    /// Allocate device memory
    ///
    /// Returns the null address for a zero-sized request.
    fn allocate(size_bytes: usize, device: &Self::Device) -> crate::error::Result<u64>;

    /// Deallocate device memory
    fn deallocate(ptr: u64, size_bytes: usize, device: &Self::Device);

    /// Copy data from host to device
    fn copy_to_device(src: &[u8], dst: u64, device: &Self::Device);

    /// Copy data from device to host
    ///
    /// Waits for queued work touching `src` to finish.
    fn copy_from_device(src: u64, dst: &mut [u8], device: &Self::Device);

    /// Get the default device
    fn default_device() -> Self::Device;

    /// Get the default client for a device
    fn default_client(device: &Self::Device) -> Self::Client;
}

/// Trait for device identification
pub trait Device: Clone + Send + Sync + 'static {
    /// Unique identifier for this device
    fn id(&self) -> usize;

    /// Check if two devices are the same
    fn is_same(&self, other: &Self) -> bool {
        self.id() == other.id()
    }

    /// Human-readable name
    fn name(&self) -> String {
        format!("Device({})", self.id())
    }
}

/// Trait for runtime clients that handle operation dispatch
pub trait RuntimeClient<R: Runtime>: Clone + Send + Sync {
    /// Get the device this client operates on
    fn device(&self) -> &R::Device;

    /// Synchronize: wait for all pending operations to complete
    fn synchronize(&self);

    /// Get the allocator for this client
    fn allocator(&self) -> &R::Allocator;

    /// Run `kernel` once per lane in `0..lanes`
    ///
    /// Lanes are independent: a kernel must only touch memory owned by its own
    /// lane. Launches on one client execute in issue order.
    fn launch<F>(&self, lanes: usize, kernel: F)
    where
        F: Fn(usize) + Send + Sync;
}
