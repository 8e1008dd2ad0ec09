//! Entry points applying stored Householder reflectors to a matrix

use super::{validate, Handle, Storev};
use crate::batch::{MatrixArg, VectorArg};
use crate::blas::{Blas, Op, Side};
use crate::dtype::Scalar;
use crate::error::{Error, Result};
use crate::linalg;
use crate::runtime::Runtime;
use crate::workspace::ormxx_workspace;

/// Validated shape of an update call
#[derive(Copy, Clone)]
struct Dims {
    m: usize,
    n: usize,
    k: usize,
    batch_count: usize,
}

impl Dims {
    fn is_empty(&self) -> bool {
        self.m == 0 || self.n == 0 || self.k == 0 || self.batch_count == 0
    }
}

/// Where the reflectors live in `a`, per routine
enum Storage {
    /// orm2r: `nq × k`, requires `k <= nq`
    Columns,
    /// orml2: `k × nq`, requires `k <= nq`
    Rows,
    /// ormbr: either orientation, any `k`
    Bidiagonal(Storev),
}

#[allow(clippy::too_many_arguments)]
fn check_args<T: Scalar>(
    storage: Storage,
    side: Side,
    op: Op,
    m: i32,
    n: i32,
    k: i32,
    a: &MatrixArg<T>,
    tau: &VectorArg<T>,
    c: &MatrixArg<T>,
    batch_count: i32,
) -> Result<Dims> {
    let m = validate::dim("m", m)?;
    let n = validate::dim("n", n)?;
    let k = validate::dim("k", k)?;
    let batch_count = validate::batch_count(batch_count)?;
    let nq = match side {
        Side::Left => m,
        Side::Right => n,
    };

    // Rows of a that hold reflector data
    let a_rows = match storage {
        Storage::Columns | Storage::Rows if k > nq => {
            return Err(Error::invalid_size("k", format!("k ({k}) > nq ({nq})")));
        }
        Storage::Columns | Storage::Bidiagonal(Storev::ColumnWise) => nq,
        Storage::Rows => k,
        Storage::Bidiagonal(Storev::RowWise) => nq.min(k),
    };
    validate::matrix("lda", "stride_a", a, a_rows, batch_count)?;
    validate::vector("stride_p", tau, batch_count)?;
    validate::matrix("ldc", "stride_c", c, m, batch_count)?;

    validate::pointer("a", a.addr(), batch_count)?;
    validate::pointer("tau", tau.addr(), batch_count)?;
    validate::pointer("c", c.addr(), batch_count)?;

    validate::op::<T>(op)?;
    validate::same_batch_mode(a, c)?;
    Ok(Dims {
        m,
        n,
        k,
        batch_count,
    })
}

/// Multiply `m × n` matrices C by the Q of a QR factorization
///
/// `C := op(Q) · C` (`Side::Left`, Q `m × m`) or `C := C · op(Q)`
/// (`Side::Right`, Q `n × n`), where `Q = H₀ ⋯ H_{k-1}` is given by the `k`
/// column-wise reflectors and scalars geqr2 left in `a` and `tau`. `op` is
/// `NoTrans`, or `Trans` for real and `ConjTrans` for complex types. `a` is
/// restored before the call returns.
///
/// # Safety
/// See the [module documentation](super#safety).
#[allow(clippy::too_many_arguments)]
pub unsafe fn orm2r<R: Runtime, B: Blas<R>, T: Scalar>(
    handle: &Handle<R, B>,
    side: Side,
    op: Op,
    m: i32,
    n: i32,
    k: i32,
    a: MatrixArg<T>,
    tau: VectorArg<T>,
    c: MatrixArg<T>,
    batch_count: i32,
) -> Result<()> {
    log::trace!(
        "orm2r<{}>: side = {side:?}, op = {op:?}, m = {m}, n = {n}, k = {k}, batch_count = {batch_count}",
        T::DTYPE
    );
    let dims = check_args(Storage::Columns, side, op, m, n, k, &a, &tau, &c, batch_count)?;
    if dims.is_empty() {
        return Ok(());
    }

    let Dims {
        m,
        n,
        k,
        batch_count,
    } = dims;
    let c = c.to_batch();
    let sizes = ormxx_workspace::<T>(side, m, n, k, batch_count, c.is_pointer_batched())?;
    handle.run::<T>("orm2r", sizes, batch_count, |ctx, ws| unsafe {
        linalg::orm2r(ctx, side, op, m, n, k, a.to_batch(), tau.to_batch(), c, ws)
    })
}

/// Multiply `m × n` matrices C by the Q of an LQ factorization
///
/// `C := op(Q) · C` or `C := C · op(Q)` with `Q = H_{k-1}ᴴ ⋯ H₀ᴴ` given by the
/// `k` row-wise reflectors and scalars gelq2 left in `a` and `tau`. Otherwise
/// as [`orm2r`].
///
/// # Safety
/// See the [module documentation](super#safety).
#[allow(clippy::too_many_arguments)]
pub unsafe fn orml2<R: Runtime, B: Blas<R>, T: Scalar>(
    handle: &Handle<R, B>,
    side: Side,
    op: Op,
    m: i32,
    n: i32,
    k: i32,
    a: MatrixArg<T>,
    tau: VectorArg<T>,
    c: MatrixArg<T>,
    batch_count: i32,
) -> Result<()> {
    log::trace!(
        "orml2<{}>: side = {side:?}, op = {op:?}, m = {m}, n = {n}, k = {k}, batch_count = {batch_count}",
        T::DTYPE
    );
    let dims = check_args(Storage::Rows, side, op, m, n, k, &a, &tau, &c, batch_count)?;
    if dims.is_empty() {
        return Ok(());
    }

    let Dims {
        m,
        n,
        k,
        batch_count,
    } = dims;
    let c = c.to_batch();
    let sizes = ormxx_workspace::<T>(side, m, n, k, batch_count, c.is_pointer_batched())?;
    handle.run::<T>("orml2", sizes, batch_count, |ctx, ws| unsafe {
        linalg::orml2(ctx, side, op, m, n, k, a.to_batch(), tau.to_batch(), c, ws)
    })
}

/// Multiply `m × n` matrices C by Q or P of a bidiagonal reduction `A = Q · B · Pᴴ`
///
/// `Storev::ColumnWise` applies Q, whose reflectors are stored column-wise in
/// `a` (`nq × min(nq, k)`, k the column count of the reduced matrix);
/// `Storev::RowWise` applies P, stored row-wise (`min(nq, k) × nq`, k its row
/// count). When the reflectors do not cover the whole order `nq` of the applied
/// factor, they are read one row below (Q) or one column right of (P) the
/// diagonal and act on all rows (left) or columns (right) of C but the first.
///
/// # Safety
/// See the [module documentation](super#safety).
#[allow(clippy::too_many_arguments)]
pub unsafe fn ormbr<R: Runtime, B: Blas<R>, T: Scalar>(
    handle: &Handle<R, B>,
    storev: Storev,
    side: Side,
    op: Op,
    m: i32,
    n: i32,
    k: i32,
    a: MatrixArg<T>,
    tau: VectorArg<T>,
    c: MatrixArg<T>,
    batch_count: i32,
) -> Result<()> {
    log::trace!(
        "ormbr<{}>: storev = {storev:?}, side = {side:?}, op = {op:?}, m = {m}, n = {n}, k = {k}, batch_count = {batch_count}",
        T::DTYPE
    );
    let dims = check_args(
        Storage::Bidiagonal(storev),
        side,
        op,
        m,
        n,
        k,
        &a,
        &tau,
        &c,
        batch_count,
    )?;
    if dims.is_empty() {
        return Ok(());
    }

    let Dims {
        m,
        n,
        k,
        batch_count,
    } = dims;
    let c = c.to_batch();
    let sizes = ormxx_workspace::<T>(side, m, n, k, batch_count, c.is_pointer_batched())?;
    handle.run::<T>("ormbr", sizes, batch_count, |ctx, ws| unsafe {
        linalg::ormbr(ctx, storev, side, op, m, n, k, a.to_batch(), tau.to_batch(), c, ws)
    })
}
