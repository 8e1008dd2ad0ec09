//! Blocked LU factorization with partial pivoting

use super::auxiliary::{laswp, merge_info, reset_info};
use super::block_sizes::GETRF_GETF2_SWITCHSIZE;
use super::getf2::getf2;
use super::Ctx;
use crate::batch::{MatrixBatch, VectorBatch};
use crate::blas::{trsm_batched, Blas, Diag, Fill, HostMembers, Op, Side};
use crate::dtype::Scalar;
use crate::runtime::Runtime;
use crate::workspace::{elem_offset, getrf_is_blocked, Regions};

/// Blocked form of [`getf2`]: same contract
///
/// Each panel of [`GETRF_GETF2_SWITCHSIZE`] columns is factored by getf2, its
/// interchanges are applied to the columns left and right of it, the block row of
/// U is solved against the unit lower panel, and the trailing block gets a gemm
/// update.
///
/// Workspace: getf2's `work`; `scratch` holds the pivot index followed by the
/// panel status.
///
/// # Safety
/// See the [module documentation](super).
pub(crate) unsafe fn getrf<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    m: usize,
    n: usize,
    a: MatrixBatch<T>,
    ipiv: VectorBatch<i32>,
    info: VectorBatch<i32>,
    ws: Regions,
) {
    let bc = ctx.batch_count;
    if !getrf_is_blocked(m, n) {
        log::debug!("getrf: {m} x {n}, unblocked");
        unsafe { getf2(ctx, m, n, a, ipiv, 0, info, ws.work, ws.scratch) };
        return;
    }
    log::debug!("getrf: {m} x {n}, panels of {GETRF_GETF2_SWITCHSIZE}");

    let pivot_index = ws.scratch;
    let panel_info = VectorBatch::<i32>::per_member(elem_offset::<i32>(ws.scratch, bc));
    let members = HostMembers::resolve::<R, T>(ctx.client, &a, bc);
    let k = m.min(n);

    unsafe {
        reset_info(ctx, info);

        for j in (0..k).step_by(GETRF_GETF2_SWITCHSIZE) {
            let jb = (k - j).min(GETRF_GETF2_SWITCHSIZE);
            getf2(
                ctx,
                m - j,
                jb,
                a.at(j, j),
                ipiv.offset(j),
                j,
                panel_info,
                ws.work,
                pivot_index,
            );
            merge_info(ctx, info, panel_info, j);

            laswp(ctx, j, a, j, j + jb, ipiv);

            let right = n - j - jb;
            if right == 0 {
                continue;
            }
            laswp(ctx, right, a.at(0, j + jb), j, j + jb, ipiv);

            // U₁₂ := L₁₁⁻¹ A₁₂, then A₂₂ -= L₂₁ U₁₂
            trsm_batched(
                ctx.blas,
                ctx.client,
                &members,
                Side::Left,
                Fill::Lower,
                Op::NoTrans,
                Diag::Unit,
                jb,
                right,
                T::one(),
                a.at(j, j),
                a.at(j, j + jb),
            );
            ctx.blas.gemm(
                ctx.client,
                Op::NoTrans,
                Op::NoTrans,
                m - j - jb,
                right,
                jb,
                ctx.minus_one(),
                a.at(j + jb, j),
                a.at(j, j + jb),
                ctx.one(),
                a.at(j + jb, j + jb),
                bc,
            );
        }
    }
}
