//! Unblocked LU factorization with partial pivoting

use super::auxiliary::reset_info;
use super::Ctx;
use crate::batch::{MatrixBatch, ScalarArg, VectorBatch};
use crate::blas::Blas;
use crate::dtype::Scalar;
use crate::runtime::Runtime;

/// `A = P · L · U` for `m × n` members
///
/// L (unit diagonal, not stored) and U overwrite A. Row `j` was interchanged
/// with row `ipiv[j] - 1 - pivot_offset`; the recorded indices are 1-based and
/// include `pivot_offset`, so a panel of a larger matrix records absolute rows.
/// `info[b]` is reset to 0 and set to `j + 1` at the first exactly zero pivot;
/// the remaining columns are still factored.
///
/// Workspace: `work` holds one reciprocal pivot per member, `pivot_index` one
/// `i32` per member.
///
/// # Safety
/// See the [module documentation](super).
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn getf2<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    m: usize,
    n: usize,
    a: MatrixBatch<T>,
    ipiv: VectorBatch<i32>,
    pivot_offset: usize,
    info: VectorBatch<i32>,
    work: u64,
    pivot_index: u64,
) {
    let bc = ctx.batch_count;
    if bc == 0 {
        return;
    }
    unsafe { reset_info(ctx, info) };

    let recip = VectorBatch::<T>::per_member(work);
    let index = VectorBatch::<i32>::per_member(pivot_index);

    for j in 0..m.min(n) {
        unsafe {
            ctx.blas.iamax(ctx.client, m - j, a.column(j, j), index, bc);
            pivot(ctx, j, n, a, ipiv, pivot_offset, index, recip, info);

            let below = m - j - 1;
            let right = n - j - 1;
            ctx.blas
                .scal(ctx.client, below, ScalarArg::Device(recip), a.column(j + 1, j), bc);
            ctx.blas.ger(
                ctx.client,
                false,
                below,
                right,
                ctx.minus_one(),
                a.column(j + 1, j),
                a.row(j, j + 1),
                a.at(j + 1, j + 1),
                bc,
            );
        }
    }
}

/// Record and apply the pivot of column `j`, and compute its reciprocal
///
/// A zero pivot means the whole remaining column is zero: the member records
/// `info = j + 1` if it has not failed before and the column is left as is.
#[allow(clippy::too_many_arguments)]
unsafe fn pivot<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    j: usize,
    n: usize,
    a: MatrixBatch<T>,
    ipiv: VectorBatch<i32>,
    pivot_offset: usize,
    index: VectorBatch<i32>,
    recip: VectorBatch<T>,
    info: VectorBatch<i32>,
) {
    ctx.launch(|b| unsafe {
        let p = j + *index.member(b) as usize - 1;
        *ipiv.get(b, j) = (p + pivot_offset + 1) as i32;

        let base = a.member(b);
        let ld = a.ld();
        let value = *base.add(p + j * ld);
        if value.is_zero() {
            let status = info.member(b);
            if *status == 0 {
                *status = j as i32 + 1;
            }
            *recip.member(b) = T::one();
            return;
        }
        *recip.member(b) = T::one() / value;

        if p != j {
            for c in 0..n {
                std::ptr::swap(base.add(j + c * ld), base.add(p + c * ld));
            }
        }
    });
}
