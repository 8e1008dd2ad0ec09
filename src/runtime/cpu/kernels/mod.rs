//! Single-matrix BLAS kernels for the CPU provider
//!
//! Each kernel works on one batch member through raw column-major pointers:
//! element (i, j) of a matrix with leading dimension `ld` lives at `i + j * ld`,
//! element i of a vector at `i * inc`. Batching happens one level up in
//! [`CpuBlas`](super::CpuBlas), which launches one lane per member.

mod level1;
mod level2;
mod level3;

pub use level1::{dot, iamax, nrm2, scal};
pub use level2::{gemv, ger};
pub use level3::{gemm, herk, trsm};

use crate::blas::Op;
use crate::dtype::Scalar;

/// Element (i, j) of op(A)
///
/// # Safety
/// The addressed element of A must be readable.
#[inline(always)]
pub(crate) unsafe fn op_elem<T: Scalar>(a: *const T, ld: usize, op: Op, i: usize, j: usize) -> T {
    unsafe {
        match op {
            Op::NoTrans => *a.add(i + j * ld),
            Op::Trans => *a.add(j + i * ld),
            Op::ConjTrans => (*a.add(j + i * ld)).conj(),
        }
    }
}
