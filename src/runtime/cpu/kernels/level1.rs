//! Vector kernels: dot, nrm2, scal, iamax

use crate::dtype::{Element, RealScalar, Scalar};

/// Σ conj?(x_i) · y_i
///
/// # Safety
/// `x` and `y` must be readable for `n` elements at their increments.
#[inline]
pub unsafe fn dot<T: Scalar>(
    conj: bool,
    n: usize,
    x: *const T,
    incx: usize,
    y: *const T,
    incy: usize,
) -> T {
    let mut acc = T::zero();
    for i in 0..n {
        let (xi, yi) = unsafe { (*x.add(i * incx), *y.add(i * incy)) };
        let xi = if conj { xi.conj() } else { xi };
        acc = acc + xi * yi;
    }
    acc
}

/// Euclidean norm with running rescaling, so squares of large entries never
/// overflow
///
/// # Safety
/// `x` must be readable for `n` elements at increment `incx`.
#[inline]
pub unsafe fn nrm2<T: Scalar>(n: usize, x: *const T, incx: usize) -> T::Real {
    let zero = T::Real::zero();
    let one = T::Real::one();
    let mut scale = zero;
    let mut ssq = one;

    for i in 0..n {
        let xi = unsafe { *x.add(i * incx) };
        for part in [xi.re(), xi.im()] {
            if part == zero {
                continue;
            }
            let a = part.abs();
            if scale < a {
                let r = scale / a;
                ssq = one + ssq * r * r;
                scale = a;
            } else {
                let r = a / scale;
                ssq = ssq + r * r;
            }
        }
    }

    scale * ssq.sqrt()
}

/// x := alpha · x
///
/// # Safety
/// `x` must be writable for `n` elements at increment `incx`.
#[inline]
pub unsafe fn scal<T: Scalar>(n: usize, alpha: T, x: *mut T, incx: usize) {
    for i in 0..n {
        unsafe {
            let p = x.add(i * incx);
            *p = alpha * *p;
        }
    }
}

/// 1-based index of the first entry with the largest `|re| + |im|`, 0 for `n == 0`
///
/// # Safety
/// `x` must be readable for `n` elements at increment `incx`.
#[inline]
pub unsafe fn iamax<T: Scalar>(n: usize, x: *const T, incx: usize) -> i32 {
    if n == 0 {
        return 0;
    }

    let mut best = 0;
    let mut best_val = unsafe { (*x).abs1() };
    for i in 1..n {
        let v = unsafe { (*x.add(i * incx)).abs1() };
        if v > best_val {
            best = i;
            best_val = v;
        }
    }
    best as i32 + 1
}
