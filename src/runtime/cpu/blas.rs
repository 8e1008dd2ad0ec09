//! Reference primitive provider for the CPU runtime

use super::client::CpuClient;
use super::kernels;
use super::runtime::CpuRuntime;
use crate::batch::{MatrixBatch, ScalarArg, VectorBatch};
use crate::blas::{Blas, Diag, Fill, Op, Side};
use crate::dtype::Scalar;
use crate::runtime::RuntimeClient;

/// Batched BLAS on the CPU: one lane per batch member
#[derive(Copy, Clone, Debug, Default)]
pub struct CpuBlas;

#[allow(clippy::too_many_arguments)]
impl Blas<CpuRuntime> for CpuBlas {
    unsafe fn dot<T: Scalar>(
        &self,
        client: &CpuClient,
        conj: bool,
        n: usize,
        x: VectorBatch<T>,
        y: VectorBatch<T>,
        result: VectorBatch<T>,
        batch_count: usize,
    ) {
        client.launch(batch_count, |b| unsafe {
            *result.member(b) = kernels::dot(conj, n, x.member(b), x.inc(), y.member(b), y.inc());
        });
    }

    unsafe fn nrm2<T: Scalar>(
        &self,
        client: &CpuClient,
        n: usize,
        x: VectorBatch<T>,
        result: VectorBatch<T::Real>,
        batch_count: usize,
    ) {
        client.launch(batch_count, |b| unsafe {
            *result.member(b) = kernels::nrm2(n, x.member(b), x.inc());
        });
    }

    unsafe fn scal<T: Scalar>(
        &self,
        client: &CpuClient,
        n: usize,
        alpha: ScalarArg<T>,
        x: VectorBatch<T>,
        batch_count: usize,
    ) {
        if n == 0 {
            return;
        }
        client.launch(batch_count, |b| unsafe {
            kernels::scal(n, alpha.value(b), x.member(b), x.inc());
        });
    }

    unsafe fn iamax<T: Scalar>(
        &self,
        client: &CpuClient,
        n: usize,
        x: VectorBatch<T>,
        result: VectorBatch<i32>,
        batch_count: usize,
    ) {
        client.launch(batch_count, |b| unsafe {
            *result.member(b) = kernels::iamax(n, x.member(b), x.inc());
        });
    }

    unsafe fn gemv<T: Scalar>(
        &self,
        client: &CpuClient,
        op: Op,
        m: usize,
        n: usize,
        alpha: ScalarArg<T>,
        a: MatrixBatch<T>,
        x: VectorBatch<T>,
        beta: ScalarArg<T>,
        y: VectorBatch<T>,
        batch_count: usize,
    ) {
        client.launch(batch_count, |b| unsafe {
            kernels::gemv(
                op,
                m,
                n,
                alpha.value(b),
                a.member(b),
                a.ld(),
                x.member(b),
                x.inc(),
                beta.value(b),
                y.member(b),
                y.inc(),
            );
        });
    }

    unsafe fn ger<T: Scalar>(
        &self,
        client: &CpuClient,
        conj: bool,
        m: usize,
        n: usize,
        alpha: ScalarArg<T>,
        x: VectorBatch<T>,
        y: VectorBatch<T>,
        a: MatrixBatch<T>,
        batch_count: usize,
    ) {
        if m == 0 || n == 0 {
            return;
        }
        client.launch(batch_count, |b| unsafe {
            kernels::ger(
                conj,
                m,
                n,
                alpha.value(b),
                x.member(b),
                x.inc(),
                y.member(b),
                y.inc(),
                a.member(b),
                a.ld(),
            );
        });
    }

    unsafe fn trsm<T: Scalar>(
        &self,
        _client: &CpuClient,
        side: Side,
        fill: Fill,
        op: Op,
        diag: Diag,
        m: usize,
        n: usize,
        alpha: T,
        a: MatrixBatch<T>,
        b: MatrixBatch<T>,
    ) {
        unsafe {
            kernels::trsm(
                side,
                fill,
                op,
                diag,
                m,
                n,
                alpha,
                a.member(0),
                a.ld(),
                b.member(0),
                b.ld(),
            );
        }
    }

    unsafe fn herk<T: Scalar>(
        &self,
        client: &CpuClient,
        fill: Fill,
        op: Op,
        n: usize,
        k: usize,
        alpha: T::Real,
        a: MatrixBatch<T>,
        beta: T::Real,
        c: MatrixBatch<T>,
        batch_count: usize,
    ) {
        if n == 0 {
            return;
        }
        client.launch(batch_count, |b| unsafe {
            kernels::herk(fill, op, n, k, alpha, a.member(b), a.ld(), beta, c.member(b), c.ld());
        });
    }

    unsafe fn gemm<T: Scalar>(
        &self,
        client: &CpuClient,
        op_a: Op,
        op_b: Op,
        m: usize,
        n: usize,
        k: usize,
        alpha: ScalarArg<T>,
        a: MatrixBatch<T>,
        b: MatrixBatch<T>,
        beta: ScalarArg<T>,
        c: MatrixBatch<T>,
        batch_count: usize,
    ) {
        if m == 0 || n == 0 {
            return;
        }
        client.launch(batch_count, |lane| unsafe {
            kernels::gemm(
                op_a,
                op_b,
                m,
                n,
                k,
                alpha.value(lane),
                a.member(lane),
                a.ld(),
                b.member(lane),
                b.ld(),
                beta.value(lane),
                c.member(lane),
                c.ld(),
            );
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::cpu::CpuDevice;

    #[test]
    fn test_gemv_per_member_device_alpha() {
        let client = CpuClient::new(CpuDevice::new());
        // Two 2 × 2 identity members, stride 4
        let a = [1.0f64, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0];
        let x = [1.0f64, 2.0];
        let alphas = [3.0f64, -1.0];
        let mut y = [0.0f64; 4];
        unsafe {
            CpuBlas.gemv(
                &client,
                Op::NoTrans,
                2,
                2,
                ScalarArg::Device(VectorBatch::per_member(alphas.as_ptr() as u64)),
                MatrixBatch::strided(a.as_ptr() as u64, 2, 4),
                VectorBatch::strided(x.as_ptr() as u64, 1, 0),
                ScalarArg::Host(0.0),
                VectorBatch::strided(y.as_mut_ptr() as u64, 1, 2),
                2,
            );
        }
        assert_eq!(y, [3.0, 6.0, -1.0, -2.0]);
    }
}
