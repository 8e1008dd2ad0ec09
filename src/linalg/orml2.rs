//! Update with row-wise reflectors, as produced by an LQ factorization

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
/// `Q = H_{k-1}ᴴ ⋯ H₀ᴴ` is given by the `k` reflectors stored in the rows of
/// `a` (`k × nq`, nq = m for the left side and n for the right), as left by
/// gelq2. `a` is modified during the call and restored before it returns.
///
/// # Safety
/// See the [module documentation](super).
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn orml2<R: Runtime, B: Blas<R>, T: Scalar>(
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
    let nq = if left { m } else { n };
    let forward = left != op.is_transposed();
    let diag = VectorBatch::<T>::per_member(ws.scratch);

    unsafe {
        // Applying Q itself uses the conjugated scalars
        let _tau = Conjugated::new(ctx, if op.is_transposed() { 0 } else { k }, tau);

        for step in 0..k {
            let i = if forward { step } else { k - 1 - step };
            let (mi, ni, ic, jc) = if left { (m - i, n, i, 0) } else { (m, n - i, 0, i) };

            let v = a.row(i, i);
            let _tail = Conjugated::new(ctx, nq - i - 1, a.row(i, (i + 1).min(nq - 1)));
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
