//! Bookkeeping lane kernels shared by the solvers

use super::Ctx;
use crate::batch::{MatrixBatch, VectorBatch};
use crate::blas::Blas;
use crate::dtype::Scalar;
use crate::runtime::Runtime;
use crate::workspace::elem_offset;

/// `info[b] := 0`
pub(crate) unsafe fn reset_info<R: Runtime, B: Blas<R>>(ctx: &Ctx<'_, R, B>, info: VectorBatch<i32>) {
    ctx.launch(|b| unsafe { *info.member(b) = 0 });
}

/// Fold a panel status into the call status
///
/// Only the first failure of a member is kept; the panel-local index is shifted
/// by the panel's first column.
pub(crate) unsafe fn merge_info<R: Runtime, B: Blas<R>>(
    ctx: &Ctx<'_, R, B>,
    info: VectorBatch<i32>,
    panel_info: VectorBatch<i32>,
    offset: usize,
) {
    let offset = offset as i32;
    ctx.launch(|b| unsafe {
        let dst = info.member(b);
        let src = *panel_info.member(b);
        if *dst == 0 && src != 0 {
            *dst = src + offset;
        }
    });
}

/// Conjugate `n` elements of `x` in place; a no-op for real types
pub(crate) unsafe fn lacgv<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    n: usize,
    x: VectorBatch<T>,
) {
    if n == 0 || !T::DTYPE.is_complex() {
        return;
    }
    ctx.launch(|b| unsafe {
        for i in 0..n {
            let p = x.get(b, i);
            *p = (*p).conj();
        }
    });
}

/// Apply the row interchanges `k1..k2` recorded in `ipiv` to `n` columns of `a`
///
/// `a` starts at row 0; `ipiv` holds absolute 1-based row indices.
pub(crate) unsafe fn laswp<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    n: usize,
    a: MatrixBatch<T>,
    k1: usize,
    k2: usize,
    ipiv: VectorBatch<i32>,
) {
    if n == 0 || k1 >= k2 {
        return;
    }
    ctx.launch(|b| unsafe {
        let base = a.member(b);
        let ld = a.ld();
        for i in k1..k2 {
            let p = (*ipiv.get(b, i) - 1) as usize;
            if p != i {
                for c in 0..n {
                    std::ptr::swap(base.add(i + c * ld), base.add(p + c * ld));
                }
            }
        }
    });
}

/// `array[b] := base + b * len` elements of `T`
///
/// Turns a packed per-member scratch buffer into a pointer batch.
pub(crate) unsafe fn setup_batch_array<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    array: u64,
    base: u64,
    len: usize,
) {
    let out = VectorBatch::<u64>::per_member(array);
    ctx.launch(|b| unsafe { *out.member(b) = elem_offset::<T>(base, b * len) });
}

/// `dst[b] := -src[b]`
pub(crate) unsafe fn negate<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    src: VectorBatch<T>,
    dst: VectorBatch<T>,
) {
    ctx.launch(|b| unsafe { *dst.member(b) = -*src.member(b) });
}
