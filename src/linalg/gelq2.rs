//! Unblocked Householder LQ

use super::larf::larf;
use super::larfg::larfg;
use super::scoped::{Conjugated, ReflectorHead};
use super::Ctx;
use crate::batch::{MatrixBatch, VectorBatch};
use crate::blas::{Blas, Side};
use crate::dtype::Scalar;
use crate::runtime::Runtime;
use crate::workspace::Regions;

/// `A = L · Q` for `m × n` members
///
/// L overwrites the lower triangle (trapezoid); right of the diagonal, row j
/// holds the tail of reflector j and `tau[j]` its scalar, for `j < min(m, n)`.
/// `Q = H_{k-1}ᴴ ⋯ H₀ᴴ`. For complex types the stored tails are conjugated
/// back, so row j holds `conj(v[1..])`.
///
/// # Safety
/// See the [module documentation](super).
pub(crate) unsafe fn gelq2<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    m: usize,
    n: usize,
    a: MatrixBatch<T>,
    tau: VectorBatch<T>,
    ws: Regions,
) {
    let diag = VectorBatch::<T>::per_member(ws.scratch);

    for j in 0..m.min(n) {
        let row = a.row(j, j);
        let tau_j = tau.offset(j);
        unsafe {
            let _conj = Conjugated::new(ctx, n - j, row);
            larfg(ctx, n - j, row, a.row(j, (j + 1).min(n - 1)), tau_j, ws.work);

            if j + 1 < m {
                let _head = ReflectorHead::new(ctx, row, diag);
                larf(
                    ctx,
                    Side::Right,
                    m - j - 1,
                    n - j,
                    row,
                    tau_j,
                    a.at(j + 1, j),
                    ws.work,
                    ws.work_array,
                );
            }
        }
    }
}
