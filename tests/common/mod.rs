//! Common test utilities
#![allow(dead_code)]

use numr_lapack::api::Handle;
use numr_lapack::dtype::{DType, Element, RealScalar, Scalar};
use numr_lapack::runtime::cpu::{CpuBlas, CpuClient, CpuDevice, CpuRuntime};
use numr_lapack::runtime::Runtime;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::marker::PhantomData;

pub type CpuHandle = Handle<CpuRuntime, CpuBlas>;

/// Create a CPU handle for testing
pub fn create_cpu_handle() -> CpuHandle {
    Handle::cpu()
}

/// CPU handle whose allocator refuses more than `limit_bytes` at once
pub fn create_limited_handle(limit_bytes: usize) -> CpuHandle {
    let client = CpuClient::new(CpuDevice::new()).with_memory_limit(limit_bytes);
    Handle::new(client, CpuBlas)
}

/// Seeded generator, so failures reproduce
pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Device buffer owned by a test, released on drop
pub struct DeviceVec<T: bytemuck::Pod> {
    addr: u64,
    len: usize,
    device: CpuDevice,
    _marker: PhantomData<T>,
}

impl<T: bytemuck::Pod> DeviceVec<T> {
    /// Allocate and upload `data`
    pub fn from_slice(data: &[T]) -> Self {
        let device = CpuRuntime::default_device();
        let bytes = std::mem::size_of_val(data);
        let addr = CpuRuntime::allocate(bytes, &device).expect("device allocation");
        CpuRuntime::copy_to_device(bytemuck::cast_slice(data), addr, &device);
        Self {
            addr,
            len: data.len(),
            device,
            _marker: PhantomData,
        }
    }

    /// Device pointer to element 0
    pub fn ptr(&self) -> *mut T {
        self.addr as *mut T
    }

    /// Device pointer to element `i`
    pub fn ptr_at(&self, i: usize) -> *mut T {
        self.ptr().wrapping_add(i)
    }

    /// Download the whole buffer
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = vec![T::zeroed(); self.len];
        CpuRuntime::copy_from_device(self.addr, bytemuck::cast_slice_mut(&mut out), &self.device);
        out
    }
}

impl<T: bytemuck::Pod> Drop for DeviceVec<T> {
    fn drop(&mut self) {
        CpuRuntime::deallocate(self.addr, self.len * std::mem::size_of::<T>(), &self.device);
    }
}

/// Device array of member pointers into a buffer of `T`
pub struct PointerArray<T> {
    addrs: DeviceVec<u64>,
    _marker: PhantomData<T>,
}

impl<T> PointerArray<T> {
    /// Device pointer to the array
    pub fn ptr(&self) -> *const *mut T {
        self.addrs.ptr() as *const *mut T
    }
}

/// Device array holding the addresses of `batch` members `stride` elements apart
pub fn member_pointers<T: bytemuck::Pod>(buf: &DeviceVec<T>, stride: usize, batch: usize) -> PointerArray<T> {
    let addrs: Vec<u64> = (0..batch).map(|b| buf.ptr_at(b * stride) as u64).collect();
    PointerArray {
        addrs: DeviceVec::from_slice(&addrs),
        _marker: PhantomData,
    }
}

/// Real value as the working type's real part
pub fn real<T: Scalar>(v: f64) -> T::Real {
    <T::Real as Element>::from_f64(v)
}

/// Uniform entry in [-1, 1) (both parts for complex types)
pub fn random_scalar<T: Scalar>(rng: &mut StdRng) -> T {
    let re = rng.random_range(-1.0..1.0);
    let im = if T::DTYPE.is_complex() {
        rng.random_range(-1.0..1.0)
    } else {
        0.0
    };
    T::from_parts(real::<T>(re), real::<T>(im))
}

/// Column-major `m × n` matrix with leading dimension m
pub fn random_matrix<T: Scalar>(rng: &mut StdRng, m: usize, n: usize) -> Vec<T> {
    (0..m * n).map(|_| random_scalar(rng)).collect()
}

/// Hermitian positive definite `n × n` matrix: `Bᴴ B + n I`
pub fn random_hpd<T: Scalar>(rng: &mut StdRng, n: usize) -> Vec<T> {
    let b = random_matrix::<T>(rng, n, n);
    let mut a = matmul(&conj_transpose(&b, n, n), &b, n, n, n);
    for i in 0..n {
        let d = a[i + i * n].re() + real::<T>(n as f64);
        a[i + i * n] = T::from_real(d);
    }
    a
}

/// Column-major `C = A B`, A `m × k`, B `k × n`
pub fn matmul<T: Scalar>(a: &[T], b: &[T], m: usize, k: usize, n: usize) -> Vec<T> {
    let mut c = vec![T::zero(); m * n];
    for j in 0..n {
        for l in 0..k {
            let blj = b[l + j * k];
            for i in 0..m {
                c[i + j * m] = c[i + j * m] + a[i + l * m] * blj;
            }
        }
    }
    c
}

/// `Aᴴ` of an `m × n` matrix
pub fn conj_transpose<T: Scalar>(a: &[T], m: usize, n: usize) -> Vec<T> {
    let mut t = vec![T::zero(); m * n];
    for j in 0..n {
        for i in 0..m {
            t[j + i * n] = a[i + j * m].conj();
        }
    }
    t
}

/// `n × n` identity
pub fn identity<T: Scalar>(n: usize) -> Vec<T> {
    let mut a = vec![T::zero(); n * n];
    for i in 0..n {
        a[i + i * n] = T::one();
    }
    a
}

/// Copy of the `m × n` matrix keeping only the entries where `keep(i, j)`
pub fn masked<T: Scalar>(a: &[T], m: usize, n: usize, keep: impl Fn(usize, usize) -> bool) -> Vec<T> {
    let mut out = vec![T::zero(); m * n];
    for j in 0..n {
        for i in 0..m {
            if keep(i, j) {
                out[i + j * m] = a[i + j * m];
            }
        }
    }
    out
}

/// Leading `m × n` block of a matrix with leading dimension `ld`
pub fn block<T: Scalar>(a: &[T], ld: usize, m: usize, n: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(m * n);
    for j in 0..n {
        out.extend_from_slice(&a[j * ld..j * ld + m]);
    }
    out
}

/// Default tolerance for the working precision
pub fn tol<T: Scalar>() -> f64 {
    match <T::Real as Element>::DTYPE {
        DType::F32 => 2e-4,
        _ => 1e-10,
    }
}

/// Assert `|got - want| <= tol · (1 + |want|)` elementwise
pub fn assert_allclose<T: Scalar>(got: &[T], want: &[T], tol: f64, msg: &str) {
    assert_eq!(got.len(), want.len(), "{}: length mismatch", msg);
    let tol = real::<T>(tol);
    let one = <T::Real as Element>::one();
    for (i, (x, y)) in got.iter().zip(want.iter()).enumerate() {
        let diff = (*x - *y).abs_sq().sqrt();
        let bound = tol * (one + y.abs_sq().sqrt());
        assert!(
            diff <= bound,
            "{}: element {} differs: {:?} vs {:?} (diff={:?}, tol={:?})",
            msg,
            i,
            x,
            y,
            diff,
            bound
        );
    }
}

/// Apply the interchanges `ipiv` (1-based) to the rows of an `m × n` matrix
pub fn apply_pivots<T: Scalar>(a: &[T], m: usize, n: usize, ipiv: &[i32]) -> Vec<T> {
    let mut out = a.to_vec();
    for (j, &p) in ipiv.iter().enumerate() {
        let p = (p - 1) as usize;
        if p != j {
            for c in 0..n {
                out.swap(j + c * m, p + c * m);
            }
        }
    }
    out
}
