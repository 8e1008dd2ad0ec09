//! Unblocked Cholesky factorization

use super::auxiliary::reset_info;
use super::scoped::Conjugated;
use super::Ctx;
use crate::batch::{MatrixBatch, ScalarArg, VectorBatch};
use crate::blas::{Blas, Fill, Op};
use crate::dtype::{Element, RealScalar, Scalar};
use crate::runtime::Runtime;
use crate::workspace::elem_offset;

/// `A = Uᴴ · U` (upper) or `A = L · Lᴴ` (lower) for `n × n` Hermitian members
///
/// Only the `fill` triangle is read and overwritten. `info[b]` is reset to 0 and
/// set to `j + 1` when the leading `(j + 1) × (j + 1)` minor of member b is not
/// positive definite; the loop still runs to the end, and the factor is valid
/// for the leading `j × j` block.
///
/// Workspace: `work` holds one dot product and one reciprocal pivot per member.
///
/// # Safety
/// See the [module documentation](super).
pub(crate) unsafe fn potf2<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    fill: Fill,
    n: usize,
    a: MatrixBatch<T>,
    info: VectorBatch<i32>,
    work: u64,
) {
    let bc = ctx.batch_count;
    if bc == 0 {
        return;
    }
    unsafe { reset_info(ctx, info) };

    let dots = VectorBatch::<T>::per_member(work);
    let recip = VectorBatch::<T>::per_member(elem_offset::<T>(work, bc));

    for j in 0..n {
        let rest = n - j - 1;
        unsafe {
            match fill {
                Fill::Upper => {
                    let col = a.column(0, j);
                    ctx.blas.dot(ctx.client, true, j, col, col, dots, bc);
                    sqrt_diag(ctx, j, a.column(j, j), dots, recip, info);

                    if rest > 0 {
                        let row = a.row(j, j + 1);
                        {
                            let _conj = Conjugated::new(ctx, j, col);
                            ctx.blas.gemv(
                                ctx.client,
                                Op::Trans,
                                j,
                                rest,
                                ctx.minus_one(),
                                a.at(0, j + 1),
                                col,
                                ctx.one(),
                                row,
                                bc,
                            );
                        }
                        ctx.blas
                            .scal(ctx.client, rest, ScalarArg::Device(recip), row, bc);
                    }
                }
                Fill::Lower => {
                    let row = a.row(j, 0);
                    ctx.blas.dot(ctx.client, true, j, row, row, dots, bc);
                    sqrt_diag(ctx, j, a.column(j, j), dots, recip, info);

                    if rest > 0 {
                        let col = a.column(j + 1, j);
                        {
                            let _conj = Conjugated::new(ctx, j, row);
                            ctx.blas.gemv(
                                ctx.client,
                                Op::NoTrans,
                                rest,
                                j,
                                ctx.minus_one(),
                                a.at(j + 1, 0),
                                row,
                                ctx.one(),
                                col,
                                bc,
                            );
                        }
                        ctx.blas
                            .scal(ctx.client, rest, ScalarArg::Device(recip), col, bc);
                    }
                }
            }
        }
    }
}

/// Diagonal step of column `j`: `a_jj := sqrt(re(a_jj) - re(dot))`
///
/// A non-positive or NaN pivot records `info = j + 1` for a member that has not
/// failed yet and stores the offending value on the diagonal. Failed members get
/// a zero reciprocal and keep their later diagonal entries.
unsafe fn sqrt_diag<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    j: usize,
    diag: VectorBatch<T>,
    dots: VectorBatch<T>,
    recip: VectorBatch<T>,
    info: VectorBatch<i32>,
) {
    let failure = j as i32 + 1;
    ctx.launch(|b| unsafe {
        let r = recip.member(b);
        let status = info.member(b);
        if *status != 0 {
            *r = T::zero();
            return;
        }

        let d = diag.member(b);
        let t = (*d).re() - (*dots.member(b)).re();
        if t <= T::Real::zero() || t.is_nan() {
            *status = failure;
            *d = T::from_real(t);
            *r = T::zero();
        } else {
            let s = t.sqrt();
            *d = T::from_real(s);
            *r = T::from_real(T::Real::one() / s);
        }
    });
}
