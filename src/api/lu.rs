//! LU factorization entry points

use super::{validate, Handle};
use crate::batch::{MatrixArg, VectorArg, VectorBatch};
use crate::blas::Blas;
use crate::dtype::Scalar;
use crate::error::Result;
use crate::linalg;
use crate::runtime::Runtime;
use crate::workspace::{getf2_workspace, getrf_workspace};

struct Dims {
    m: usize,
    n: usize,
    batch_count: usize,
}

fn check_args<T>(
    m: i32,
    n: i32,
    a: &MatrixArg<T>,
    ipiv: &VectorArg<i32>,
    info: *mut i32,
    batch_count: i32,
) -> Result<Dims> {
    let m = validate::dim("m", m)?;
    let n = validate::dim("n", n)?;
    let batch_count = validate::batch_count(batch_count)?;
    validate::matrix("lda", "stride_a", a, m, batch_count)?;
    validate::vector("stride_p", ipiv, batch_count)?;

    validate::pointer("a", a.addr(), batch_count)?;
    validate::pointer("ipiv", ipiv.addr(), batch_count)?;
    validate::pointer("info", info as u64, batch_count)?;
    Ok(Dims { m, n, batch_count })
}

/// Unblocked LU factorization with partial pivoting of `m × n` matrices
///
/// `A = P · L · U` with L unit lower triangular (diagonal not stored) and U upper
/// triangular, both overwriting A. `ipiv` receives `min(m, n)` 1-based row
/// indices per member: row `j` was interchanged with row `ipiv[j]`. `info`
/// receives 0, or the 1-based column of the first exactly zero pivot; the
/// factorization still completes, and U is then singular. An empty problem
/// returns at once and writes nothing.
///
/// # Safety
/// See the [module documentation](super#safety).
pub unsafe fn getf2<R: Runtime, B: Blas<R>, T: Scalar>(
    handle: &Handle<R, B>,
    m: i32,
    n: i32,
    a: MatrixArg<T>,
    ipiv: VectorArg<i32>,
    info: *mut i32,
    batch_count: i32,
) -> Result<()> {
    log::trace!(
        "getf2<{}>: m = {m}, n = {n}, lda = {}, batch_count = {batch_count}",
        T::DTYPE,
        a.ld()
    );
    let Dims { m, n, batch_count } = check_args(m, n, &a, &ipiv, info, batch_count)?;

    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(());
    }

    let sizes = getf2_workspace::<T>(m, n, batch_count)?;
    handle.run::<T>("getf2", sizes, batch_count, |ctx, ws| unsafe {
        linalg::getf2(
            ctx,
            m,
            n,
            a.to_batch(),
            ipiv.to_batch(),
            0,
            VectorBatch::per_member(info as u64),
            ws.work,
            ws.scratch,
        )
    })
}

/// Blocked LU factorization with partial pivoting: same contract as [`getf2`]
///
/// When `min(m, n)` reaches
/// [`GETRF_GETF2_SWITCHSIZE`](crate::linalg::block_sizes::GETRF_GETF2_SWITCHSIZE)
/// the matrix is factored panel by panel with trsm and gemm updates from the
/// primitive provider. Pivots and factors match getf2 up to rounding.
///
/// # Safety
/// See the [module documentation](super#safety).
pub unsafe fn getrf<R: Runtime, B: Blas<R>, T: Scalar>(
    handle: &Handle<R, B>,
    m: i32,
    n: i32,
    a: MatrixArg<T>,
    ipiv: VectorArg<i32>,
    info: *mut i32,
    batch_count: i32,
) -> Result<()> {
    log::trace!(
        "getrf<{}>: m = {m}, n = {n}, lda = {}, batch_count = {batch_count}",
        T::DTYPE,
        a.ld()
    );
    let Dims { m, n, batch_count } = check_args(m, n, &a, &ipiv, info, batch_count)?;

    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(());
    }

    let sizes = getrf_workspace::<T>(m, n, batch_count)?;
    handle.run::<T>("getrf", sizes, batch_count, |ctx, ws| unsafe {
        linalg::getrf(
            ctx,
            m,
            n,
            a.to_batch(),
            ipiv.to_batch(),
            VectorBatch::per_member(info as u64),
            ws,
        )
    })
}
