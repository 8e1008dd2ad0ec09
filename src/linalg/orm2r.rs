//! Update with column-wise reflectors, as produced by a QR factorization

use super::larf::larf;
use super::scoped::{Conjugated, ReflectorHead};
use super::Ctx;
use crate::batch::{MatrixBatch, VectorBatch};
use crate::blas::{Blas, Op, Side};
use crate::dtype::Scalar;
use crate::runtime::Runtime;
use crate::workspace::Regions;

/// `C := op(Q) · C` (left) or `C := C · op(Q)` (right), C `m × n`
///
/// `Q = H₀ · H₁ ⋯ H_{k-1}` is given by the `k` reflectors stored in the columns
/// of `a` (`nq × k`), as left by geqr2. `a` is modified during the call and
/// restored before it returns.
///
/// # Safety
/// See the [module documentation](super).
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn orm2r<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    side: Side,
    op: Op,
    m: usize,
    n: usize,
    k: usize,
    a: MatrixBatch<T>,
    tau: VectorBatch<T>,
    c: MatrixBatch<T>,
    ws: Regions,
) {
    if m == 0 || n == 0 || k == 0 {
        return;
    }

    let left = side == Side::Left;
    let forward = left == op.is_transposed();
    let diag = VectorBatch::<T>::per_member(ws.scratch);

    unsafe {
        // Applying Qᴴ uses the conjugated scalars
        let _tau = Conjugated::new(ctx, if op.is_transposed() { k } else { 0 }, tau);

        for step in 0..k {
            let i = if forward { step } else { k - 1 - step };
            let (mi, ni, ic, jc) = if left { (m - i, n, i, 0) } else { (m, n - i, 0, i) };

            let v = a.column(i, i);
            let _head = ReflectorHead::new(ctx, v, diag);
            larf(
                ctx,
                side,
                mi,
                ni,
                v,
                tau.offset(i),
                c.at(ic, jc),
                ws.work,
                ws.work_array,
            );
        }
    }
}
