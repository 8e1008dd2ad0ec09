//! Blocked Cholesky factorization

use super::auxiliary::{merge_info, reset_info};
use super::block_sizes::POTRF_POTF2_SWITCHSIZE;
use super::potf2::potf2;
use super::Ctx;
use crate::batch::{MatrixBatch, VectorBatch};
use crate::blas::{trsm_batched, Blas, Diag, Fill, HostMembers, Op, Side};
use crate::dtype::{Element, Scalar};
use crate::runtime::Runtime;
use crate::workspace::Regions;

/// Blocked form of [`potf2`]: same contract
///
/// Orders below [`POTRF_POTF2_SWITCHSIZE`] run potf2 directly. Otherwise the
/// diagonal block of each panel is factored by potf2 into a per-panel status,
/// the off-diagonal block is solved against it and the trailing block gets a
/// Hermitian rank-`jb` update. A member whose panel fails keeps the first failure
/// and is factored to the end.
///
/// Workspace: potf2's `work` at the panel width; `scratch` holds the panel status.
///
/// # Safety
/// See the [module documentation](super).
pub(crate) unsafe fn potrf<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    fill: Fill,
    n: usize,
    a: MatrixBatch<T>,
    info: VectorBatch<i32>,
    ws: Regions,
) {
    let bc = ctx.batch_count;
    if n < POTRF_POTF2_SWITCHSIZE {
        log::debug!("potrf: n = {n}, unblocked");
        unsafe { potf2(ctx, fill, n, a, info, ws.work) };
        return;
    }
    log::debug!("potrf: n = {n}, panels of {POTRF_POTF2_SWITCHSIZE}");

    let panel_info = VectorBatch::<i32>::per_member(ws.scratch);
    let members = HostMembers::resolve::<R, T>(ctx.client, &a, bc);
    let minus_one = -T::Real::one();
    let one = T::Real::one();

    unsafe {
        reset_info(ctx, info);

        for j in (0..n).step_by(POTRF_POTF2_SWITCHSIZE) {
            let jb = (n - j).min(POTRF_POTF2_SWITCHSIZE);
            potf2(ctx, fill, jb, a.at(j, j), panel_info, ws.work);
            merge_info(ctx, info, panel_info, j);

            let rest = n - j - jb;
            if rest == 0 {
                continue;
            }
            match fill {
                Fill::Upper => {
                    // U₁₂ := U₁₁⁻ᴴ A₁₂, then A₂₂ -= U₁₂ᴴ U₁₂
                    trsm_batched(
                        ctx.blas,
                        ctx.client,
                        &members,
                        Side::Left,
                        Fill::Upper,
                        Op::ConjTrans,
                        Diag::NonUnit,
                        jb,
                        rest,
                        T::one(),
                        a.at(j, j),
                        a.at(j, j + jb),
                    );
                    ctx.blas.herk(
                        ctx.client,
                        Fill::Upper,
                        Op::ConjTrans,
                        rest,
                        jb,
                        minus_one,
                        a.at(j, j + jb),
                        one,
                        a.at(j + jb, j + jb),
                        bc,
                    );
                }
                Fill::Lower => {
                    // L₂₁ := A₂₁ L₁₁⁻ᴴ, then A₂₂ -= L₂₁ L₂₁ᴴ
                    trsm_batched(
                        ctx.blas,
                        ctx.client,
                        &members,
                        Side::Right,
                        Fill::Lower,
                        Op::ConjTrans,
                        Diag::NonUnit,
                        rest,
                        jb,
                        T::one(),
                        a.at(j, j),
                        a.at(j + jb, j),
                    );
                    ctx.blas.herk(
                        ctx.client,
                        Fill::Lower,
                        Op::NoTrans,
                        rest,
                        jb,
                        minus_one,
                        a.at(j + jb, j),
                        one,
                        a.at(j + jb, j + jb),
                        bc,
                    );
                }
            }
        }
    }
}
