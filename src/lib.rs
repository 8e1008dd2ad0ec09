//! # numr-lapack
//!
//! **Batched dense factorizations for Rust on a pluggable compute runtime.**
//!
//! numr-lapack factors one matrix or many same-shaped matrices ("batches") in a
//! single call: Cholesky, LU with partial pivoting, Householder QR and LQ, and the
//! application of the resulting orthogonal/unitary factors.
//!
//! ## Why numr-lapack?
//!
//! - **Batched by construction**: every routine takes a single matrix, a strided
//!   batch or an array of member pointers, with the same code path
//! - **Size first, allocate second**: each call plans its workspace from the
//!   problem shape, acquires it as one scoped guard, and releases it on every path
//! - **Failures per member**: a singular or indefinite member is reported in its
//!   info slot and never aborts the rest of the batch
//! - **Pluggable primitives**: the bulk BLAS work goes through the [`blas::Blas`]
//!   trait, so a runtime can supply its vendor library
//!
//! ## Routines
//!
//! | routine | computes |
//! |---|---|
//! | [`potf2`](api::potf2), [`potrf`](api::potrf) | `A = Uᴴ U` or `A = L Lᴴ` |
//! | [`getf2`](api::getf2), [`getrf`](api::getrf) | `A = P L U` |
//! | [`geqr2`](api::geqr2) | `A = Q R` |
//! | [`gelq2`](api::gelq2) | `A = L Q` |
//! | [`orm2r`](api::orm2r), [`orml2`](api::orml2), [`ormbr`](api::ormbr) | `op(Q) C`, `C op(Q)` |
//!
//! Matrices are column-major. Each routine is generic over `f32`, `f64`,
//! [`Complex64`](dtype::Complex64) and [`Complex128`](dtype::Complex128).
//!
//! ## Quick Start
//!
//! ```rust
//! use numr_lapack::prelude::*;
//!
//! let handle = Handle::cpu();
//! // Two 2 × 2 matrices, 4 elements apart
//! let mut a = [2.0f64, 4.0, 1.0, 3.0, 0.0, 1.0, 1.0, 0.0];
//! let mut ipiv = [0i32; 4];
//! let mut info = [-1i32; 2];
//! unsafe {
//!     getrf(
//!         &handle,
//!         2,
//!         2,
//!         MatrixArg::strided(a.as_mut_ptr(), 2, 4),
//!         VectorArg::strided(ipiv.as_mut_ptr(), 2),
//!         info.as_mut_ptr(),
//!         2,
//!     )?;
//! }
//! assert_eq!(info, [0, 0]);
//! assert_eq!(ipiv, [2, 2, 2, 2]);
//! # Ok::<(), numr_lapack::error::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cpu` (default): CPU runtime and the reference primitive provider
//! - `rayon` (default): batch members run in parallel on the CPU runtime

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod api;
pub mod batch;
pub mod blas;
pub mod dtype;
pub mod error;
pub mod linalg;
pub mod runtime;
pub mod workspace;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::api::{
        gelq2, geqr2, getf2, getrf, ormbr, orml2, orm2r, potf2, potrf, Handle, Storev,
    };
    pub use crate::batch::{Layout, MatrixArg, VectorArg};
    pub use crate::blas::{Blas, Diag, Fill, Op, Side};
    pub use crate::dtype::{Complex128, Complex64, DType, Scalar};
    pub use crate::error::{Error, Result, Status};
    pub use crate::runtime::{Allocator, Device, Runtime, RuntimeClient};

    #[cfg(feature = "cpu")]
    pub use crate::runtime::cpu::{CpuBlas, CpuClient, CpuRuntime};
}

/// Default runtime based on enabled features
#[cfg(feature = "cpu")]
pub type DefaultRuntime = runtime::cpu::CpuRuntime;
