//! Application of one Householder reflector to a block

use super::auxiliary::{negate, setup_batch_array};
use super::Ctx;
use crate::batch::{MatrixBatch, ScalarArg, VectorBatch};
use crate::blas::{Blas, Op, Side};
use crate::dtype::Scalar;
use crate::runtime::Runtime;
use crate::workspace::elem_offset;

/// `C := H · C` (left) or `C := C · H` (right) with `H = I - tau · v · vᴴ`
///
/// C is `m × n`; `v` has length m (left) or n (right) and must already carry its
/// unit head. `tau` holds one scalar per member; a member whose tau is exactly
/// zero is left untouched.
///
/// Workspace: `work` holds the `w` vectors followed by the negated taus,
/// `work_array` the pointers into `work` when C is pointer-batched (see
/// [`larf_workspace`](crate::workspace::larf_workspace)).
///
/// # Safety
/// See the [module documentation](super).
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn larf<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    side: Side,
    m: usize,
    n: usize,
    v: VectorBatch<T>,
    tau: VectorBatch<T>,
    c: MatrixBatch<T>,
    work: u64,
    work_array: u64,
) {
    let bc = ctx.batch_count;
    if m == 0 || n == 0 || bc == 0 {
        return;
    }

    let (op, w_len) = match side {
        Side::Left => (Op::ConjTrans, n),
        Side::Right => (Op::NoTrans, m),
    };

    let neg_tau = VectorBatch::per_member(elem_offset::<T>(work, bc * w_len));
    unsafe { negate(ctx, tau, neg_tau) };

    let w = if c.is_pointer_batched() {
        unsafe { setup_batch_array::<R, B, T>(ctx, work_array, work, w_len) };
        VectorBatch::pointers(work_array, 1)
    } else {
        VectorBatch::strided(work, 1, w_len)
    };

    unsafe {
        // w := Cᴴ v (left) or C v (right)
        ctx.blas
            .gemv(ctx.client, op, m, n, ctx.one(), c, v, ctx.zero(), w, bc);

        // C := C - tau v wᴴ (left) or C - tau w vᴴ (right)
        let (x, y) = match side {
            Side::Left => (v, w),
            Side::Right => (w, v),
        };
        ctx.blas
            .ger(ctx.client, true, m, n, ScalarArg::Device(neg_tau), x, y, c, bc);
    }
}
