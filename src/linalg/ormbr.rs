//! Update with the orthogonal factors of a bidiagonal reduction

use super::orm2r::orm2r;
use super::orml2::orml2;
use super::Ctx;
use crate::batch::{MatrixBatch, VectorBatch};
use crate::blas::{Blas, Op, Side};
use crate::dtype::Scalar;
use crate::runtime::Runtime;
use crate::workspace::Regions;

/// Which factor of `A = Q · B · Pᴴ` an ormbr call applies
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Storev {
    /// Q, reflectors stored column-wise
    ColumnWise,
    /// P, reflectors stored row-wise
    RowWise,
}

/// `C := op(Q) · C`, `C · op(Q)`, `op(P) · C` or `C · op(P)` for a bidiagonal
/// reduction stored in `a`, C `m × n`
///
/// `k` is the column count (Q) or row count (P) of the matrix that was reduced.
/// When the reflectors cover the whole order `nq` of the applied factor the call
/// is a plain orm2r or orml2. Otherwise `nq - 1` reflectors are stored one row
/// below (Q) or one column right of (P) the diagonal and act on all rows
/// (columns) of C but the first.
///
/// # Safety
/// See the [module documentation](super).
#[allow(clippy::too_many_arguments)]
pub(crate) unsafe fn ormbr<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    storev: Storev,
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
    let left = side == Side::Left;
    let nq = if left { m } else { n };
    // The shifted problem skips the first row (left) or column (right) of C
    let (mi, ni, shifted_c) = if left {
        (m.saturating_sub(1), n, c.at(1, 0))
    } else {
        (m, n.saturating_sub(1), c.at(0, 1))
    };

    unsafe {
        match storev {
            Storev::ColumnWise => {
                if nq >= k {
                    orm2r(ctx, side, op, m, n, k, a, tau, c, ws);
                } else if nq > 1 {
                    orm2r(ctx, side, op, mi, ni, nq - 1, a.at(1, 0), tau, shifted_c, ws);
                }
            }
            Storev::RowWise => {
                // P = H₀ ⋯ H_{k-1} while orml2 applies the product of the Hᴴ
                let op = if op.is_transposed() {
                    Op::NoTrans
                } else if T::DTYPE.is_complex() {
                    Op::ConjTrans
                } else {
                    Op::Trans
                };
                if nq > k {
                    orml2(ctx, side, op, m, n, k, a, tau, c, ws);
                } else if nq > 1 {
                    orml2(ctx, side, op, mi, ni, nq - 1, a.at(0, 1), tau, shifted_c, ws);
                }
            }
        }
    }
}
