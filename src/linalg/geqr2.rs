//! Unblocked Householder QR

use super::larf::larf;
use super::larfg::larfg;
use super::scoped::{Conjugated, ReflectorHead};
use super::Ctx;
use crate::batch::{MatrixBatch, VectorBatch};
use crate::blas::{Blas, Side};
use crate::dtype::Scalar;
use crate::runtime::Runtime;
use crate::workspace::Regions;

/// `A = Q · R` for `m × n` members
///
/// R overwrites the upper triangle (trapezoid); below the diagonal, column j
/// holds the tail of reflector j, and `tau[j]` its scalar, for
/// `j < min(m, n)`. `Q = H₀ · H₁ ⋯ H_{k-1}`.
///
/// # Safety
/// See the [module documentation](super).
pub(crate) unsafe fn geqr2<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    m: usize,
    n: usize,
    a: MatrixBatch<T>,
    tau: VectorBatch<T>,
    ws: Regions,
) {
    let diag = VectorBatch::<T>::per_member(ws.scratch);

    for j in 0..m.min(n) {
        let head = a.column(j, j);
        let tau_j = tau.offset(j);
        unsafe {
            larfg(ctx, m - j, head, a.column((j + 1).min(m - 1), j), tau_j, ws.work);

            if j + 1 < n {
                // The trailing block gets Hᴴ, so the complex scalar is conjugated
                let _head = ReflectorHead::new(ctx, head, diag);
                let _tau = Conjugated::new(ctx, 1, tau_j);
                larf(
                    ctx,
                    Side::Left,
                    m - j,
                    n - j - 1,
                    head,
                    tau_j,
                    a.at(j, j + 1),
                    ws.work,
                    ws.work_array,
                );
            }
        }
    }
}
