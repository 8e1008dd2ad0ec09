//! Public entry points
//!
//! One generic function per routine, instantiated for `f32`, `f64`,
//! [`Complex64`](crate::dtype::Complex64) and [`Complex128`](crate::dtype::Complex128).
//! Each call:
//!
//! 1. validates its arguments (sizes, then pointers, then operation values)
//! 2. returns early for an empty problem, writing nothing
//! 3. plans and acquires its [`Workspace`]
//! 4. fills the constants region and runs the solver
//! 5. releases the workspace, also on failure
//!
//! A returned error means nothing was written. Numerical failures of individual
//! batch members are reported through the info vector with `Ok(())`.
//!
//! # Safety
//!
//! The entry points are `unsafe` because they dereference caller-provided device
//! addresses. For every member in `0..batch_count`:
//!
//! - the matrix (and, where present, tau / pivot / info) arguments must address
//!   allocations covering the documented shape with the given leading dimension
//!   and strides
//! - pointer arrays must hold `batch_count` valid member addresses
//! - outputs of different members must not overlap
//! - no other work may access these buffers until the call has completed
//!
//! # Example
//!
//! ```
//! use numr_lapack::prelude::*;
//!
//! let handle = Handle::cpu();
//! // 2 × 2 SPD matrix, column-major
//! let mut a = [4.0f64, 2.0, 2.0, 5.0];
//! let mut info = [-1i32];
//! unsafe {
//!     potrf(
//!         &handle,
//!         Fill::Lower,
//!         2,
//!         MatrixArg::single(a.as_mut_ptr(), 2),
//!         info.as_mut_ptr(),
//!         1,
//!     )
//!     .unwrap();
//! }
//! assert_eq!(info[0], 0);
//! assert_eq!(a[0], 2.0);
//! assert_eq!(a[1], 1.0);
//! assert_eq!(a[3], 2.0);
//! ```

mod cholesky;
mod householder;
mod lu;
mod update;
mod validate;

pub use crate::linalg::Storev;
pub use cholesky::{potf2, potrf};
pub use householder::{gelq2, geqr2};
pub use lu::{getf2, getrf};
pub use update::{ormbr, orml2, orm2r};

use crate::blas::Blas;
use crate::dtype::Scalar;
use crate::error::Result;
use crate::linalg::Ctx;
use crate::runtime::{Runtime, RuntimeClient};
use crate::workspace::{Regions, Workspace, WorkspaceSizes};
use std::fmt;

#[cfg(feature = "cpu")]
use crate::runtime::cpu::{CpuBlas, CpuRuntime};

/// Execution context of the entry points: a runtime client and a primitive
/// provider
///
/// A handle owns no workspace; each call acquires and releases its own, so one
/// handle can serve consecutive calls of any routine and scalar type.
#[derive(Clone)]
pub struct Handle<R: Runtime, B: Blas<R>> {
    client: R::Client,
    blas: B,
}

impl<R: Runtime, B: Blas<R>> Handle<R, B> {
    /// Handle over `client` using `blas` for the bulk primitives
    pub fn new(client: R::Client, blas: B) -> Self {
        Self { client, blas }
    }

    /// The runtime client
    pub fn client(&self) -> &R::Client {
        &self.client
    }

    /// The primitive provider
    pub fn blas(&self) -> &B {
        &self.blas
    }

    /// Acquire the planned workspace, fill the constants and run `body`
    fn run<T: Scalar>(
        &self,
        routine: &'static str,
        sizes: WorkspaceSizes,
        batch_count: usize,
        body: impl FnOnce(&Ctx<'_, R, B>, Regions),
    ) -> Result<()> {
        log::debug!("{routine}: workspace {} bytes {sizes:?}", sizes.total());
        let workspace = Workspace::acquire(self.client.allocator(), &sizes)
            .inspect_err(|e| log::warn!("{routine}: workspace acquisition failed: {e}"))?;
        let regions = workspace.regions();

        if regions.constants != 0 {
            let constants = [T::from_f64(-1.0), T::zero(), T::one()];
            R::copy_to_device(
                bytemuck::cast_slice(&constants),
                regions.constants,
                self.client.device(),
            );
        }

        let ctx = Ctx::new(&self.client, &self.blas, batch_count, regions.constants);
        body(&ctx, regions);
        Ok(())
    }
}

impl<R: Runtime, B: Blas<R>> fmt::Debug for Handle<R, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handle")
            .field("runtime", &R::name())
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "cpu")]
impl Handle<CpuRuntime, CpuBlas> {
    /// Handle on the default CPU device with the reference provider
    pub fn cpu() -> Self {
        let device = CpuRuntime::default_device();
        Self::new(CpuRuntime::default_client(&device), CpuBlas)
    }
}
