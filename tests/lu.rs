//! Integration tests for the LU routines (getf2, getrf)

mod common;

use common::*;
use numr_lapack::prelude::*;

/// Split a factored `m × n` member into `L` (`m × k`, unit) and `U` (`k × n`)
fn split_lu<T: Scalar>(f: &[T], m: usize, n: usize) -> (Vec<T>, Vec<T>) {
    let k = m.min(n);
    let mut l = vec![T::zero(); m * k];
    let mut u = vec![T::zero(); k * n];
    for j in 0..k {
        l[j + j * m] = T::one();
        for i in j + 1..m {
            l[i + j * m] = f[i + j * m];
        }
    }
    for j in 0..n {
        for i in 0..=j.min(k - 1) {
            u[i + j * k] = f[i + j * m];
        }
    }
    (l, u)
}

fn factor<T: Scalar>(
    blocked: bool,
    m: usize,
    n: usize,
    members: &[Vec<T>],
) -> (Vec<T>, Vec<i32>, Vec<i32>) {
    let handle = create_cpu_handle();
    let batch = members.len();
    let k = m.min(n);
    let a = DeviceVec::from_slice(&members.concat());
    let ipiv = DeviceVec::from_slice(&vec![0i32; k * batch]);
    let info = DeviceVec::from_slice(&vec![-1i32; batch]);

    let a_arg = MatrixArg::strided(a.ptr(), m as i32, (m * n) as i64);
    let p_arg = VectorArg::strided(ipiv.ptr(), k as i64);
    unsafe {
        if blocked {
            getrf(&handle, m as i32, n as i32, a_arg, p_arg, info.ptr(), batch as i32).unwrap();
        } else {
            getf2(&handle, m as i32, n as i32, a_arg, p_arg, info.ptr(), batch as i32).unwrap();
        }
    }
    (a.to_vec(), ipiv.to_vec(), info.to_vec())
}

fn check_factorization<T: Scalar>(blocked: bool, m: usize, n: usize, batch: usize, seed: u64) {
    let mut rng = rng(seed);
    let members: Vec<Vec<T>> = (0..batch).map(|_| random_matrix(&mut rng, m, n)).collect();
    let (factored, ipiv, info) = factor(blocked, m, n, &members);
    assert_eq!(info, vec![0; batch]);

    let k = m.min(n);
    for (b, original) in members.iter().enumerate() {
        let f = &factored[b * m * n..(b + 1) * m * n];
        let piv = &ipiv[b * k..(b + 1) * k];
        for (j, &p) in piv.iter().enumerate() {
            assert!(p as usize > j && p as usize <= m, "member {b}: ipiv[{j}] = {p}");
        }

        // Partial pivoting keeps every multiplier at most one in magnitude
        for j in 0..k {
            for i in j + 1..m {
                let l = f[i + j * m].abs1();
                assert!(l <= real::<T>(2.0), "member {b}: L({i}, {j}) = {l:?}");
            }
        }

        let (l, u) = split_lu(f, m, n);
        let lu = matmul(&l, &u, m, k, n);
        let pa = apply_pivots(original, m, n, piv);
        assert_allclose(&lu, &pa, tol::<T>(), &format!("{m} x {n} member {b}"));
    }
}

#[test]
fn test_getf2_square() {
    check_factorization::<f64>(false, 8, 8, 3, 1);
    check_factorization::<f32>(false, 6, 6, 2, 2);
    check_factorization::<Complex128>(false, 7, 7, 2, 3);
    check_factorization::<Complex64>(false, 5, 5, 2, 4);
}

#[test]
fn test_getf2_rectangular() {
    check_factorization::<f64>(false, 9, 4, 2, 5);
    check_factorization::<f64>(false, 4, 9, 2, 6);
    check_factorization::<Complex128>(false, 6, 3, 2, 7);
    check_factorization::<Complex64>(false, 3, 6, 2, 8);
}

#[test]
fn test_getrf_blocked() {
    check_factorization::<f64>(true, 100, 100, 2, 9);
    check_factorization::<f64>(true, 130, 70, 2, 10);
    check_factorization::<f64>(true, 70, 130, 2, 11);
    check_factorization::<Complex128>(true, 80, 80, 2, 12);
}

#[test]
fn test_getrf_small_delegates() {
    check_factorization::<f32>(true, 10, 10, 3, 13);
    check_factorization::<Complex64>(true, 12, 5, 2, 14);
}

#[test]
fn test_blocked_and_unblocked_agree() {
    let mut rng = rng(15);
    let members = vec![random_matrix::<f64>(&mut rng, 100, 100)];
    let (blocked, ipiv_b, _) = factor(true, 100, 100, &members);
    let (unblocked, ipiv_u, _) = factor(false, 100, 100, &members);
    assert_eq!(ipiv_b, ipiv_u);
    assert_allclose(&blocked, &unblocked, 1e-9, "blocked vs unblocked");
}

#[test]
fn test_known_pivots() {
    // [[2, 1], [4, 3]]: swap rows, multiplier 1/2, U = [[4, 3], [0, -1/2]]
    let (f, ipiv, info) = factor(false, 2, 2, &[vec![2.0f64, 4.0, 1.0, 3.0]]);
    assert_eq!(info, vec![0]);
    assert_eq!(ipiv, vec![2, 2]);
    assert_eq!(f, vec![4.0, 0.5, 3.0, -0.5]);
}

#[test]
fn test_singular_member() {
    let n = 5;
    let mut rng = rng(16);
    let mut members: Vec<Vec<f64>> = (0..3).map(|_| random_matrix(&mut rng, n, n)).collect();
    // Column 2 of member 1 is zero
    for i in 0..n {
        members[1][i + 2 * n] = 0.0;
    }
    for blocked in [false, true] {
        let (factored, ipiv, info) = factor(blocked, n, n, &members);
        assert_eq!(info, vec![0, 3, 0]);

        // A zero pivot leaves the row order alone and the factorization completes
        assert_eq!(ipiv[n + 2], 3);
        let f = &factored[n * n..2 * n * n];
        let (l, u) = split_lu(f, n, n);
        let lu = matmul(&l, &u, n, n, n);
        let pa = apply_pivots(&members[1], n, n, &ipiv[n..2 * n]);
        assert_allclose(&lu, &pa, 1e-10, "singular member");
    }
}

#[test]
fn test_singular_in_second_panel() {
    let n = 90;
    let mut rng = rng(17);
    let mut a = random_matrix::<f64>(&mut rng, n, n);
    // Column 70 is zero
    for i in 0..n {
        a[i + 70 * n] = 0.0;
    }
    let (_, _, info) = factor(true, n, n, &[a]);
    assert_eq!(info, vec![71]);
}

#[test]
fn test_first_zero_pivot_wins() {
    let n = 4;
    let mut a = identity::<f64>(n);
    a[1 + n] = 0.0;
    a[3 + 3 * n] = 0.0;
    let (_, _, info) = factor(false, n, n, &[a]);
    assert_eq!(info, vec![2]);
}

#[test]
fn test_pointer_batched_pivots() {
    let handle = create_cpu_handle();
    let n = 6;
    let mut rng = rng(18);
    let members: Vec<Vec<f64>> = (0..2).map(|_| random_matrix(&mut rng, n, n)).collect();
    let a = DeviceVec::from_slice(&members.concat());
    let ptrs = member_pointers(&a, n * n, 2);
    let ipiv = DeviceVec::from_slice(&vec![0i32; 2 * n]);
    let info = DeviceVec::from_slice(&[-1i32; 2]);
    unsafe {
        getrf(
            &handle,
            n as i32,
            n as i32,
            MatrixArg::pointers(ptrs.ptr(), n as i32),
            VectorArg::strided(ipiv.ptr(), n as i64),
            info.ptr(),
            2,
        )
        .unwrap();
    }

    let (strided, ipiv_s, info_s) = factor(true, n, n, &members);
    assert_eq!(a.to_vec(), strided);
    assert_eq!(ipiv.to_vec(), ipiv_s);
    assert_eq!(info.to_vec(), info_s);
}
