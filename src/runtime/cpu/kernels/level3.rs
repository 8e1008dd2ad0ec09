//! Matrix-matrix kernels: trsm, herk, gemm

use super::op_elem;
use crate::blas::{Diag, Fill, Op, Side};
use crate::dtype::{Element, Scalar};

/// Triangular solve with multiple right-hand sides
///
/// `B := alpha · op(A)⁻¹ · B` (left, A `m × m`) or `B := alpha · B · op(A)⁻¹`
/// (right, A `n × n`), B `m × n`. Only the `fill` triangle of A is read.
///
/// # Safety
/// - All pointers must be valid for the specified dimensions and strides
/// - B must not overlap the referenced triangle of A
#[allow(clippy::too_many_arguments)]
pub unsafe fn trsm<T: Scalar>(
    side: Side,
    fill: Fill,
    op: Op,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: *const T,
    lda: usize,
    b: *mut T,
    ldb: usize,
) {
    // Transposing flips which triangle op(A) occupies
    let lower = (fill == Fill::Lower) != op.is_transposed();
    let unit = diag == Diag::Unit;
    let opa = |i: usize, j: usize| unsafe { op_elem(a, lda, op, i, j) };

    unsafe {
        match side {
            Side::Left => {
                for c in 0..n {
                    let col = b.add(c * ldb);
                    let x = |i: usize| col.add(i);
                    if lower {
                        for i in 0..m {
                            let mut s = alpha * *x(i);
                            for k in 0..i {
                                s = s - opa(i, k) * *x(k);
                            }
                            *x(i) = if unit { s } else { s / opa(i, i) };
                        }
                    } else {
                        for i in (0..m).rev() {
                            let mut s = alpha * *x(i);
                            for k in i + 1..m {
                                s = s - opa(i, k) * *x(k);
                            }
                            *x(i) = if unit { s } else { s / opa(i, i) };
                        }
                    }
                }
            }
            Side::Right => {
                // Row r of X solves x · op(A) = alpha · b
                for r in 0..m {
                    let x = |j: usize| b.add(r + j * ldb);
                    if lower {
                        for j in (0..n).rev() {
                            let mut s = alpha * *x(j);
                            for k in j + 1..n {
                                s = s - *x(k) * opa(k, j);
                            }
                            *x(j) = if unit { s } else { s / opa(j, j) };
                        }
                    } else {
                        for j in 0..n {
                            let mut s = alpha * *x(j);
                            for k in 0..j {
                                s = s - *x(k) * opa(k, j);
                            }
                            *x(j) = if unit { s } else { s / opa(j, j) };
                        }
                    }
                }
            }
        }
    }
}

/// Hermitian rank-k update of the `fill` triangle of C (`n × n`)
///
/// `C := alpha · A · Aᴴ + beta · C` (NoTrans, A `n × k`) or
/// `C := alpha · Aᴴ · A + beta · C` (Trans/ConjTrans, A `k × n`). The diagonal of
/// C comes out real.
///
/// # Safety
/// - All pointers must be valid for the specified dimensions and strides
/// - C must not overlap A
#[allow(clippy::too_many_arguments)]
pub unsafe fn herk<T: Scalar>(
    fill: Fill,
    op: Op,
    n: usize,
    k: usize,
    alpha: T::Real,
    a: *const T,
    lda: usize,
    beta: T::Real,
    c: *mut T,
    ldc: usize,
) {
    let beta_zero = beta == T::Real::zero();

    for j in 0..n {
        let rows = match fill {
            Fill::Upper => 0..j + 1,
            Fill::Lower => j..n,
        };
        for i in rows {
            let mut acc = T::zero();
            unsafe {
                for l in 0..k {
                    acc = acc
                        + match op {
                            Op::NoTrans => *a.add(i + l * lda) * (*a.add(j + l * lda)).conj(),
                            Op::Trans | Op::ConjTrans => {
                                (*a.add(l + i * lda)).conj() * *a.add(l + j * lda)
                            }
                        };
                }
                let cij = c.add(i + j * ldc);
                let mut v = acc.scale(alpha);
                if !beta_zero {
                    v = v + (*cij).scale(beta);
                }
                *cij = if i == j { T::from_real(v.re()) } else { v };
            }
        }
    }
}

/// C := alpha · op(A) · op(B) + beta · C, C `m × n`, inner dimension `k`
///
/// # Safety
/// - All pointers must be valid for the specified dimensions and strides
/// - C must not overlap A or B
#[allow(clippy::too_many_arguments)]
pub unsafe fn gemm<T: Scalar>(
    op_a: Op,
    op_b: Op,
    m: usize,
    n: usize,
    k: usize,
    alpha: T,
    a: *const T,
    lda: usize,
    b: *const T,
    ldb: usize,
    beta: T,
    c: *mut T,
    ldc: usize,
) {
    for j in 0..n {
        for i in 0..m {
            unsafe {
                let mut acc = T::zero();
                if !alpha.is_zero() {
                    for l in 0..k {
                        acc = acc + op_elem(a, lda, op_a, i, l) * op_elem(b, ldb, op_b, l, j);
                    }
                }
                let cij = c.add(i + j * ldc);
                *cij = if beta.is_zero() {
                    alpha * acc
                } else {
                    alpha * acc + beta * *cij
                };
            }
        }
    }
}
