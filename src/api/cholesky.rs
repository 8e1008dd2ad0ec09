//! Cholesky factorization entry points

use super::{validate, Handle};
use crate::batch::{MatrixArg, VectorBatch};
use crate::blas::{Blas, Fill};
use crate::dtype::Scalar;
use crate::error::Result;
use crate::linalg;
use crate::runtime::Runtime;
use crate::workspace::{potf2_workspace, potrf_workspace};

fn check_args<T>(n: i32, a: &MatrixArg<T>, info: *mut i32, batch_count: i32) -> Result<(usize, usize)> {
    let n = validate::dim("n", n)?;
    let batch_count = validate::batch_count(batch_count)?;
    validate::matrix("lda", "stride_a", a, n, batch_count)?;
    validate::pointer("a", a.addr(), batch_count)?;
    validate::pointer("info", info as u64, batch_count)?;
    Ok((n, batch_count))
}

/// Unblocked Cholesky factorization of `n × n` Hermitian positive definite matrices
///
/// `A = Uᴴ · U` (`Fill::Upper`) or `A = L · Lᴴ` (`Fill::Lower`); only that
/// triangle of A is read and overwritten with the factor. `info` receives one
/// `i32` per member: 0, or `j > 0` when the leading `j × j` minor is not
/// positive definite (the factor is then only valid for the leading
/// `(j - 1) × (j - 1)` block). An empty problem returns at once and writes
/// nothing, `info` included.
///
/// # Safety
/// See the [module documentation](super#safety).
pub unsafe fn potf2<R: Runtime, B: Blas<R>, T: Scalar>(
    handle: &Handle<R, B>,
    fill: Fill,
    n: i32,
    a: MatrixArg<T>,
    info: *mut i32,
    batch_count: i32,
) -> Result<()> {
    log::trace!(
        "potf2<{}>: fill = {fill:?}, n = {n}, lda = {}, batch_count = {batch_count}",
        T::DTYPE,
        a.ld()
    );
    let (n, batch_count) = check_args(n, &a, info, batch_count)?;

    if n == 0 || batch_count == 0 {
        return Ok(());
    }

    let sizes = potf2_workspace::<T>(n, batch_count)?;
    handle.run::<T>("potf2", sizes, batch_count, |ctx, ws| unsafe {
        linalg::potf2(ctx, fill, n, a.to_batch(), VectorBatch::per_member(info as u64), ws.work)
    })
}

/// Blocked Cholesky factorization: same contract as [`potf2`]
///
/// Orders of at least [`POTRF_POTF2_SWITCHSIZE`](crate::linalg::block_sizes::POTRF_POTF2_SWITCHSIZE)
/// are factored panel by panel, with the off-diagonal and trailing updates done
/// by the primitive provider's trsm and herk. A member that fails keeps the
/// first failure in `info`.
///
/// # Safety
/// See the [module documentation](super#safety).
pub unsafe fn potrf<R: Runtime, B: Blas<R>, T: Scalar>(
    handle: &Handle<R, B>,
    fill: Fill,
    n: i32,
    a: MatrixArg<T>,
    info: *mut i32,
    batch_count: i32,
) -> Result<()> {
    log::trace!(
        "potrf<{}>: fill = {fill:?}, n = {n}, lda = {}, batch_count = {batch_count}",
        T::DTYPE,
        a.ld()
    );
    let (n, batch_count) = check_args(n, &a, info, batch_count)?;

    if n == 0 || batch_count == 0 {
        return Ok(());
    }

    let sizes = potrf_workspace::<T>(n, batch_count)?;
    handle.run::<T>("potrf", sizes, batch_count, |ctx, ws| unsafe {
        linalg::potrf(ctx, fill, n, a.to_batch(), VectorBatch::per_member(info as u64), ws)
    })
}
