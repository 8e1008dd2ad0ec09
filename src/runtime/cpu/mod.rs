//! CPU runtime implementation
//!
//! The CPU runtime uses heap allocation as "device" memory and runs lane kernels
//! on rayon. [`CpuBlas`] is the reference primitive provider for it: every
//! batched primitive launches one lane per batch member and runs a plain
//! column-major loop nest inside the lane.

mod blas;
mod client;
mod device;
pub(crate) mod kernels;
mod runtime;

pub use blas::CpuBlas;
pub use client::{CpuAllocator, CpuClient};
pub use device::CpuDevice;
pub use runtime::CpuRuntime;
