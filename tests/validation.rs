//! Argument validation, quick returns and workspace failures

mod common;

use common::*;
use numr_lapack::prelude::*;
use std::ptr::null_mut;

/// Sentinel contents: every call that fails must leave them unchanged
const SENTINEL: f64 = 7.25;

fn assert_invalid_size<T: std::fmt::Debug>(result: Result<T>, expected: &str) {
    match result {
        Err(Error::InvalidSize { arg, .. }) => assert_eq!(arg, expected),
        other => panic!("expected InvalidSize({expected}), got {other:?}"),
    }
}

#[test]
fn test_negative_sizes() {
    let handle = create_cpu_handle();
    let a = DeviceVec::from_slice(&[SENTINEL; 16]);
    let info = DeviceVec::from_slice(&[-1i32; 2]);
    let ipiv = DeviceVec::from_slice(&[-1i32; 4]);
    let tau = DeviceVec::from_slice(&[SENTINEL; 4]);
    let c = DeviceVec::from_slice(&[SENTINEL; 16]);
    let single = MatrixArg::<f64>::single(a.ptr(), 4);

    unsafe {
        assert_invalid_size(potrf(&handle, Fill::Lower, -1, single, info.ptr(), 1), "n");
        assert_invalid_size(potf2(&handle, Fill::Upper, 2, single, info.ptr(), -1), "batch_count");
        assert_invalid_size(
            getrf(&handle, -2, 2, single, VectorArg::single(ipiv.ptr()), info.ptr(), 1),
            "m",
        );
        assert_invalid_size(
            getf2(&handle, 2, -2, single, VectorArg::single(ipiv.ptr()), info.ptr(), 1),
            "n",
        );
        assert_invalid_size(geqr2(&handle, 4, -4, single, VectorArg::single(tau.ptr()), 1), "n");
        assert_invalid_size(gelq2(&handle, -4, 4, single, VectorArg::single(tau.ptr()), 1), "m");
        assert_invalid_size(
            orm2r(
                &handle,
                Side::Left,
                Op::NoTrans,
                4,
                4,
                -1,
                single,
                VectorArg::single(tau.ptr()),
                MatrixArg::single(c.ptr(), 4),
                1,
            ),
            "k",
        );
    }

    assert_eq!(a.to_vec(), vec![SENTINEL; 16]);
    assert_eq!(c.to_vec(), vec![SENTINEL; 16]);
    assert_eq!(tau.to_vec(), vec![SENTINEL; 4]);
    assert_eq!(info.to_vec(), vec![-1; 2]);
    assert_eq!(ipiv.to_vec(), vec![-1; 4]);
}

#[test]
fn test_leading_dimension_and_strides() {
    let handle = create_cpu_handle();
    let a = DeviceVec::from_slice(&[SENTINEL; 32]);
    let info = DeviceVec::from_slice(&[-1i32; 2]);
    let ipiv = DeviceVec::from_slice(&[-1i32; 8]);

    unsafe {
        assert_invalid_size(
            potrf(&handle, Fill::Lower, 4, MatrixArg::<f64>::single(a.ptr(), 3), info.ptr(), 1),
            "lda",
        );
        assert_invalid_size(
            potrf(&handle, Fill::Lower, 4, MatrixArg::<f64>::strided(a.ptr(), 4, -16), info.ptr(), 2),
            "stride_a",
        );
        // A single matrix cannot serve a batch, nor can a zero stride
        assert_invalid_size(
            potrf(&handle, Fill::Lower, 4, MatrixArg::<f64>::single(a.ptr(), 4), info.ptr(), 2),
            "batch_count",
        );
        assert_invalid_size(
            potrf(&handle, Fill::Lower, 4, MatrixArg::<f64>::strided(a.ptr(), 4, 0), info.ptr(), 2),
            "stride_a",
        );
        assert_invalid_size(
            getrf(
                &handle,
                4,
                4,
                MatrixArg::<f64>::strided(a.ptr(), 4, 16),
                VectorArg::single(ipiv.ptr()),
                info.ptr(),
                2,
            ),
            "stride_p",
        );
        assert_invalid_size(
            getrf(
                &handle,
                4,
                4,
                MatrixArg::<f64>::strided(a.ptr(), 4, 16),
                VectorArg::strided(ipiv.ptr(), -4),
                info.ptr(),
                2,
            ),
            "stride_p",
        );
        // lda counts the rows even when there are no columns
        assert_invalid_size(
            getrf(
                &handle,
                4,
                0,
                MatrixArg::<f64>::single(a.ptr(), 2),
                VectorArg::single(ipiv.ptr()),
                info.ptr(),
                1,
            ),
            "lda",
        );
    }
    assert_eq!(a.to_vec(), vec![SENTINEL; 32]);
    assert_eq!(info.to_vec(), vec![-1; 2]);
}

#[test]
fn test_update_sizes() {
    let handle = create_cpu_handle();
    let a = DeviceVec::from_slice(&[SENTINEL; 36]);
    let tau = DeviceVec::from_slice(&[SENTINEL; 6]);
    let c = DeviceVec::from_slice(&[SENTINEL; 36]);
    let tau_arg = VectorArg::single(tau.ptr());

    unsafe {
        // More reflectors than the order of Q
        assert_invalid_size(
            orm2r(
                &handle,
                Side::Left,
                Op::NoTrans,
                4,
                6,
                5,
                MatrixArg::<f64>::single(a.ptr(), 4),
                tau_arg,
                MatrixArg::single(c.ptr(), 4),
                1,
            ),
            "k",
        );
        // orml2 stores k rows, so lda >= k
        assert_invalid_size(
            orml2(
                &handle,
                Side::Right,
                Op::NoTrans,
                3,
                6,
                4,
                MatrixArg::<f64>::single(a.ptr(), 3),
                tau_arg,
                MatrixArg::single(c.ptr(), 3),
                1,
            ),
            "lda",
        );
        // ldc >= m
        assert_invalid_size(
            orm2r(
                &handle,
                Side::Right,
                Op::NoTrans,
                5,
                3,
                2,
                MatrixArg::<f64>::single(a.ptr(), 3),
                tau_arg,
                MatrixArg::single(c.ptr(), 4),
                1,
            ),
            "ldc",
        );
        // ormbr accepts k > nq
        ormbr(
            &handle,
            Storev::ColumnWise,
            Side::Left,
            Op::NoTrans,
            1,
            3,
            5,
            MatrixArg::<f64>::single(a.ptr(), 1),
            tau_arg,
            MatrixArg::single(c.ptr(), 1),
            1,
        )
        .unwrap();
    }
    assert_eq!(c.to_vec(), vec![SENTINEL; 36]);
}

#[test]
fn test_null_pointers() {
    let handle = create_cpu_handle();
    let a = DeviceVec::from_slice(&[SENTINEL; 16]);
    let tau = DeviceVec::from_slice(&[SENTINEL; 4]);
    let ipiv = DeviceVec::from_slice(&[-1i32; 4]);
    let info = DeviceVec::from_slice(&[-1i32; 1]);
    let single = MatrixArg::<f64>::single(a.ptr(), 4);

    unsafe {
        let null_a = MatrixArg::<f64>::single(null_mut(), 4);
        let err = potrf(&handle, Fill::Lower, 4, null_a, info.ptr(), 1);
        assert_eq!(err, Err(Error::InvalidPointer { arg: "a" }));
        let err = potf2(&handle, Fill::Lower, 4, single, null_mut(), 1);
        assert_eq!(err, Err(Error::InvalidPointer { arg: "info" }));
        let err = getrf(&handle, 4, 4, single, VectorArg::single(null_mut()), info.ptr(), 1);
        assert_eq!(err, Err(Error::InvalidPointer { arg: "ipiv" }));
        let err = geqr2(&handle, 4, 4, single, VectorArg::single(null_mut()), 1);
        assert_eq!(err, Err(Error::InvalidPointer { arg: "tau" }));
        let err = orm2r(
            &handle,
            Side::Left,
            Op::NoTrans,
            4,
            4,
            4,
            single,
            VectorArg::single(tau.ptr()),
            MatrixArg::single(null_mut(), 4),
            1,
        );
        assert_eq!(err.map_err(|e| e.status()), Err(Status::InvalidPointer));

        // An empty problem still needs its pointers
        let null_a = MatrixArg::<f64>::single(null_mut(), 1);
        let err = potrf(&handle, Fill::Lower, 0, null_a, info.ptr(), 1);
        assert_eq!(err, Err(Error::InvalidPointer { arg: "a" }));
        let err = getrf(&handle, 0, 4, single, VectorArg::single(null_mut()), info.ptr(), 1);
        assert_eq!(err, Err(Error::InvalidPointer { arg: "ipiv" }));
        let err = geqr2(&handle, 0, 4, null_a, VectorArg::single(tau.ptr()), 1);
        assert_eq!(err, Err(Error::InvalidPointer { arg: "a" }));

        // An empty batch addresses nothing
        potrf(&handle, Fill::Lower, 4, MatrixArg::<f64>::single(null_mut(), 4), null_mut(), 0).unwrap();
        getrf(
            &handle,
            4,
            4,
            MatrixArg::<f64>::single(null_mut(), 4),
            VectorArg::single(null_mut()),
            null_mut(),
            0,
        )
        .unwrap();
    }
    assert_eq!(a.to_vec(), vec![SENTINEL; 16]);
    assert_eq!(tau.to_vec(), vec![SENTINEL; 4]);
    assert_eq!(ipiv.to_vec(), vec![-1; 4]);
    assert_eq!(info.to_vec(), vec![-1]);
}

#[test]
fn test_sizes_are_checked_before_pointers() {
    let handle = create_cpu_handle();
    let a = MatrixArg::<f64>::single(null_mut(), 1);
    let err = unsafe { potrf(&handle, Fill::Lower, -1, a, null_mut(), 1) };
    assert_invalid_size(err, "n");
}

#[test]
fn test_operation_against_type() {
    let handle = create_cpu_handle();
    let a = DeviceVec::from_slice(&[Complex64::new(1.0, 0.0); 16]);
    let tau = DeviceVec::from_slice(&[Complex64::new(0.0, 0.0); 4]);
    let c = DeviceVec::from_slice(&[Complex64::new(2.0, 1.0); 16]);
    let before = c.to_vec();

    let err = unsafe {
        orm2r(
            &handle,
            Side::Left,
            Op::Trans,
            4,
            4,
            4,
            MatrixArg::single(a.ptr(), 4),
            VectorArg::single(tau.ptr()),
            MatrixArg::single(c.ptr(), 4),
            1,
        )
    };
    assert!(matches!(err, Err(Error::InvalidValue { arg: "trans", .. })));

    let real_a = DeviceVec::from_slice(&[1.0f32; 16]);
    let real_tau = DeviceVec::from_slice(&[0.0f32; 4]);
    let real_c = DeviceVec::from_slice(&[2.0f32; 16]);
    let err = unsafe {
        orml2(
            &handle,
            Side::Right,
            Op::ConjTrans,
            4,
            4,
            4,
            MatrixArg::single(real_a.ptr(), 4),
            VectorArg::single(real_tau.ptr()),
            MatrixArg::single(real_c.ptr(), 4),
            1,
        )
    };
    assert_eq!(err.map_err(|e| e.status()), Err(Status::InvalidValue));

    assert_eq!(c.to_vec(), before);
    assert_eq!(real_c.to_vec(), vec![2.0f32; 16]);
}

#[test]
fn test_mixed_batch_modes_rejected() {
    let handle = create_cpu_handle();
    let a = DeviceVec::from_slice(&[0.0f64; 32]);
    let tau = DeviceVec::from_slice(&[0.0f64; 8]);
    let c = DeviceVec::from_slice(&[SENTINEL; 32]);
    let c_ptrs = member_pointers(&c, 16, 2);

    let err = unsafe {
        orm2r(
            &handle,
            Side::Left,
            Op::NoTrans,
            4,
            4,
            4,
            MatrixArg::strided(a.ptr(), 4, 16),
            VectorArg::strided(tau.ptr(), 4),
            MatrixArg::pointers(c_ptrs.ptr(), 4),
            2,
        )
    };
    assert!(matches!(err, Err(Error::InvalidValue { .. })));
    assert_eq!(c.to_vec(), vec![SENTINEL; 32]);
}

#[test]
fn test_quick_return_writes_nothing() {
    let handle = create_cpu_handle();
    let info = DeviceVec::from_slice(&[-7i32; 3]);
    let ipiv = DeviceVec::from_slice(&[-7i32; 3]);
    let tau = DeviceVec::from_slice(&[SENTINEL; 3]);
    let a = DeviceVec::from_slice(&[SENTINEL; 3]);

    unsafe {
        potrf(&handle, Fill::Lower, 0, MatrixArg::<f64>::strided(a.ptr(), 1, 1), info.ptr(), 2).unwrap();
        potf2(&handle, Fill::Upper, 0, MatrixArg::<f64>::strided(a.ptr(), 1, 1), info.ptr(), 3).unwrap();
        getf2(
            &handle,
            3,
            0,
            MatrixArg::<f64>::strided(a.ptr(), 3, 1),
            VectorArg::strided(ipiv.ptr(), 1),
            info.ptr(),
            3,
        )
        .unwrap();
        getrf(
            &handle,
            0,
            3,
            MatrixArg::<f64>::strided(a.ptr(), 1, 1),
            VectorArg::strided(ipiv.ptr(), 1),
            info.ptr(),
            3,
        )
        .unwrap();
        gelq2(&handle, 3, 0, MatrixArg::<f64>::strided(a.ptr(), 3, 1), VectorArg::strided(tau.ptr(), 1), 3)
            .unwrap();
    }
    assert_eq!(info.to_vec(), vec![-7; 3]);
    assert_eq!(ipiv.to_vec(), vec![-7; 3]);
    assert_eq!(tau.to_vec(), vec![SENTINEL; 3]);
    assert_eq!(a.to_vec(), vec![SENTINEL; 3]);
}

#[test]
fn test_empty_batch_touches_nothing() {
    let handle = create_cpu_handle();
    let info = DeviceVec::from_slice(&[-5i32; 2]);
    let ipiv = DeviceVec::from_slice(&[-5i32; 4]);
    let a = DeviceVec::from_slice(&[SENTINEL; 8]);
    unsafe {
        potrf(&handle, Fill::Lower, 2, MatrixArg::<f64>::strided(a.ptr(), 2, 4), info.ptr(), 0).unwrap();
        getrf(
            &handle,
            2,
            2,
            MatrixArg::<f64>::strided(a.ptr(), 2, 4),
            VectorArg::strided(ipiv.ptr(), 2),
            info.ptr(),
            0,
        )
        .unwrap();
    }
    assert_eq!(info.to_vec(), vec![-5; 2]);
    assert_eq!(ipiv.to_vec(), vec![-5; 4]);
    assert_eq!(a.to_vec(), vec![SENTINEL; 8]);
}

#[test]
fn test_workspace_failure() {
    let handle = create_limited_handle(16);
    let a = DeviceVec::from_slice(&[4.0f64, 2.0, 2.0, 5.0]);
    let info = DeviceVec::from_slice(&[-1i32]);

    let result = unsafe { potrf(&handle, Fill::Lower, 2, MatrixArg::single(a.ptr(), 2), info.ptr(), 1) };
    assert!(matches!(result, Err(Error::OutOfMemory { .. })));
    assert_eq!(Status::from(&result), Status::MemoryError);

    assert_eq!(a.to_vec(), vec![4.0, 2.0, 2.0, 5.0]);
    assert_eq!(info.to_vec(), vec![-1]);
    assert_eq!(handle.client().allocator().allocated_bytes(), 0);

    // A quick return needs no workspace
    unsafe { potrf(&handle, Fill::Lower, 0, MatrixArg::single(a.ptr(), 1), info.ptr(), 1).unwrap() };
    assert_eq!(info.to_vec(), vec![-1]);
}

#[test]
fn test_handle_serves_consecutive_calls() {
    let handle = create_cpu_handle();
    let a = DeviceVec::from_slice(&[4.0f64, 2.0, 2.0, 5.0]);
    let info = DeviceVec::from_slice(&[-1i32]);
    let tau = DeviceVec::from_slice(&[0.0f32; 2]);
    let b = DeviceVec::from_slice(&[3.0f32, 4.0, 0.0, 1.0]);
    unsafe {
        potrf(&handle, Fill::Lower, 2, MatrixArg::single(a.ptr(), 2), info.ptr(), 1).unwrap();
        geqr2(&handle, 2, 2, MatrixArg::single(b.ptr(), 2), VectorArg::single(tau.ptr()), 1).unwrap();
    }
    assert_eq!(info.to_vec(), vec![0]);
    // |(3, 4)| = 5, with the sign opposite to the head
    assert!((b.to_vec()[0] + 5.0).abs() < 1e-6);
    assert_eq!(handle.client().allocator().allocated_bytes(), 0);
}
