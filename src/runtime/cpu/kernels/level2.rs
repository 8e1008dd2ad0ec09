//! Matrix-vector kernels: gemv, ger

use super::op_elem;
use crate::blas::Op;
use crate::dtype::Scalar;

/// y := alpha · op(A) · x + beta · y, A `m × n`
///
/// # Arguments
/// * `a` - column-major A with leading dimension `lda`
/// * `x` - length n (NoTrans) or m (Trans/ConjTrans), increment `incx`
/// * `y` - length m (NoTrans) or n (Trans/ConjTrans), increment `incy`
///
/// # Safety
/// - All pointers must be valid for the specified dimensions and strides
/// - `y` must not overlap the elements of A or x that are read
#[inline]
#[allow(clippy::too_many_arguments)]
pub unsafe fn gemv<T: Scalar>(
    op: Op,
    m: usize,
    n: usize,
    alpha: T,
    a: *const T,
    lda: usize,
    x: *const T,
    incx: usize,
    beta: T,
    y: *mut T,
    incy: usize,
) {
    let (ylen, xlen) = match op {
        Op::NoTrans => (m, n),
        Op::Trans | Op::ConjTrans => (n, m),
    };

    for i in 0..ylen {
        unsafe {
            let yi = y.add(i * incy);
            *yi = if beta.is_zero() { T::zero() } else { beta * *yi };
        }
    }

    if alpha.is_zero() || xlen == 0 {
        return;
    }

    unsafe {
        match op {
            Op::NoTrans => {
                for j in 0..n {
                    let t = alpha * *x.add(j * incx);
                    let col = a.add(j * lda);
                    for i in 0..m {
                        let yi = y.add(i * incy);
                        *yi = *yi + t * *col.add(i);
                    }
                }
            }
            Op::Trans | Op::ConjTrans => {
                for j in 0..n {
                    let mut acc = T::zero();
                    for i in 0..m {
                        acc = acc + op_elem(a, lda, op, j, i) * *x.add(i * incx);
                    }
                    let yj = y.add(j * incy);
                    *yj = *yj + alpha * acc;
                }
            }
        }
    }
}

/// A := alpha · x · yᵀ + A, or `yᴴ` when `conj`; no-op for zero alpha
///
/// # Safety
/// - All pointers must be valid for the specified dimensions and strides
/// - A must not overlap x or y
#[inline]
#[allow(clippy::too_many_arguments)]
pub unsafe fn ger<T: Scalar>(
    conj: bool,
    m: usize,
    n: usize,
    alpha: T,
    x: *const T,
    incx: usize,
    y: *const T,
    incy: usize,
    a: *mut T,
    lda: usize,
) {
    if alpha.is_zero() {
        return;
    }

    for j in 0..n {
        unsafe {
            let yj = *y.add(j * incy);
            let t = alpha * if conj { yj.conj() } else { yj };
            let col = a.add(j * lda);
            for i in 0..m {
                let p = col.add(i);
                *p = *p + *x.add(i * incx) * t;
            }
        }
    }
}
