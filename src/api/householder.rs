//! Householder QR and LQ entry points

use super::{validate, Handle};
use crate::batch::{MatrixArg, VectorArg};
use crate::blas::Blas;
use crate::dtype::Scalar;
use crate::error::Result;
use crate::linalg;
use crate::runtime::Runtime;
use crate::workspace::{gelq2_workspace, geqr2_workspace};

fn check_args<T>(
    m: i32,
    n: i32,
    a: &MatrixArg<T>,
    tau: &VectorArg<T>,
    batch_count: i32,
) -> Result<(usize, usize, usize)> {
    let m = validate::dim("m", m)?;
    let n = validate::dim("n", n)?;
    let batch_count = validate::batch_count(batch_count)?;
    validate::matrix("lda", "stride_a", a, m, batch_count)?;
    validate::vector("stride_p", tau, batch_count)?;

    validate::pointer("a", a.addr(), batch_count)?;
    validate::pointer("tau", tau.addr(), batch_count)?;
    Ok((m, n, batch_count))
}

/// Unblocked QR factorization of `m × n` matrices
///
/// `A = Q · R`. On return the upper trapezoid of A holds R; column j below the
/// diagonal holds the tail of Householder vector j (its head is an implicit 1)
/// and `tau[j]` its scalar, for `j < min(m, n)`, with
/// `Q = H₀ ⋯ H_{k-1}` and `Hⱼ = I - tau[j] · vⱼ · vⱼᴴ`. Apply Q with [`orm2r`](super::orm2r).
///
/// # Safety
/// See the [module documentation](super#safety).
pub unsafe fn geqr2<R: Runtime, B: Blas<R>, T: Scalar>(
    handle: &Handle<R, B>,
    m: i32,
    n: i32,
    a: MatrixArg<T>,
    tau: VectorArg<T>,
    batch_count: i32,
) -> Result<()> {
    log::trace!(
        "geqr2<{}>: m = {m}, n = {n}, lda = {}, batch_count = {batch_count}",
        T::DTYPE,
        a.ld()
    );
    let (m, n, batch_count) = check_args(m, n, &a, &tau, batch_count)?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(());
    }

    let a = a.to_batch();
    let sizes = geqr2_workspace::<T>(m, n, batch_count, a.is_pointer_batched())?;
    handle.run::<T>("geqr2", sizes, batch_count, |ctx, ws| unsafe {
        linalg::geqr2(ctx, m, n, a, tau.to_batch(), ws)
    })
}

/// Unblocked LQ factorization of `m × n` matrices
///
/// `A = L · Q`. On return the lower trapezoid of A holds L; row j right of the
/// diagonal holds the conjugated tail of Householder vector j and `tau[j]` its
/// scalar, for `j < min(m, n)`, with `Q = H_{k-1}ᴴ ⋯ H₀ᴴ`. Apply Q with
/// [`orml2`](super::orml2).
///
/// # Safety
/// See the [module documentation](super#safety).
pub unsafe fn gelq2<R: Runtime, B: Blas<R>, T: Scalar>(
    handle: &Handle<R, B>,
    m: i32,
    n: i32,
    a: MatrixArg<T>,
    tau: VectorArg<T>,
    batch_count: i32,
) -> Result<()> {
    log::trace!(
        "gelq2<{}>: m = {m}, n = {n}, lda = {}, batch_count = {batch_count}",
        T::DTYPE,
        a.ld()
    );
    let (m, n, batch_count) = check_args(m, n, &a, &tau, batch_count)?;
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(());
    }

    let a = a.to_batch();
    let sizes = gelq2_workspace::<T>(m, n, batch_count, a.is_pointer_batched())?;
    handle.run::<T>("gelq2", sizes, batch_count, |ctx, ws| unsafe {
        linalg::gelq2(ctx, m, n, a, tau.to_batch(), ws)
    })
}
