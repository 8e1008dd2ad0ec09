//! Primitive provider interface
//!
//! The factorizations are built on a small set of batched BLAS primitives. They
//! are reached through the [`Blas`] trait so a runtime can plug in its vendor
//! library; [`CpuBlas`](crate::runtime::cpu::CpuBlas) is the reference provider
//! for the CPU runtime.
//!
//! Every primitive is batched: it applies to members `0..batch_count` of its
//! operands. Matrix and vector operands of one call share a batch mode, either
//! all strided or all pointer-batched, as vendor batched BLAS requires; scalar
//! operands and reduction results are always strided. Scalars are passed as
//! [`ScalarArg`], so a call states whether its scalar is an immediate host
//! constant or a per-member device value.
//!
//! Triangular solves are the exception: providers only need a single-matrix
//! `trsm`, and [`trsm_batched`] issues it per member from the host.

use crate::batch::{MatrixBatch, ScalarArg, VectorBatch};
use crate::dtype::Scalar;
use crate::runtime::{Runtime, RuntimeClient};

/// Operation applied to a matrix operand
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    /// op(A) = A
    NoTrans,
    /// op(A) = Aᵀ
    Trans,
    /// op(A) = Aᴴ
    ConjTrans,
}

impl Op {
    /// Whether the operand is used transposed
    #[inline]
    pub fn is_transposed(self) -> bool {
        self != Op::NoTrans
    }
}

/// Side a matrix is applied from
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// op(A) · C
    Left,
    /// C · op(A)
    Right,
}

/// Triangle of a matrix that is referenced
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Fill {
    /// Upper triangle
    Upper,
    /// Lower triangle
    Lower,
}

/// Whether a triangular matrix has an implicit unit diagonal
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Diag {
    /// Diagonal is implicitly one and not read
    Unit,
    /// Diagonal is read
    NonUnit,
}

/// Batched BLAS primitives the solvers are built on
///
/// # Safety
///
/// All methods are `unsafe`: every operand address must be valid for the
/// addressed block of every member in `0..batch_count`, and output operands of
/// different members must not overlap.
#[allow(clippy::too_many_arguments)]
pub trait Blas<R: Runtime>: Send + Sync {
    /// `result[b] = Σ conj?(x_i) · y_i`
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn dot<T: Scalar>(
        &self,
        client: &R::Client,
        conj: bool,
        n: usize,
        x: VectorBatch<T>,
        y: VectorBatch<T>,
        result: VectorBatch<T>,
        batch_count: usize,
    );

    /// `result[b] = ‖x‖₂`
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn nrm2<T: Scalar>(
        &self,
        client: &R::Client,
        n: usize,
        x: VectorBatch<T>,
        result: VectorBatch<T::Real>,
        batch_count: usize,
    );

    /// `x := alpha · x`
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn scal<T: Scalar>(
        &self,
        client: &R::Client,
        n: usize,
        alpha: ScalarArg<T>,
        x: VectorBatch<T>,
        batch_count: usize,
    );

    /// 1-based index of the first element of largest `|re| + |im|` (0 when `n == 0`)
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn iamax<T: Scalar>(
        &self,
        client: &R::Client,
        n: usize,
        x: VectorBatch<T>,
        result: VectorBatch<i32>,
        batch_count: usize,
    );

    /// `y := alpha · op(A) · x + beta · y` with A `m × n`
    ///
    /// A zero `beta` overwrites `y` without reading it.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn gemv<T: Scalar>(
        &self,
        client: &R::Client,
        op: Op,
        m: usize,
        n: usize,
        alpha: ScalarArg<T>,
        a: MatrixBatch<T>,
        x: VectorBatch<T>,
        beta: ScalarArg<T>,
        y: VectorBatch<T>,
        batch_count: usize,
    );

    /// `A := alpha · x · yᵀ + A` (`yᴴ` when `conj`), A `m × n`
    ///
    /// Members whose `alpha` is zero are left untouched.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn ger<T: Scalar>(
        &self,
        client: &R::Client,
        conj: bool,
        m: usize,
        n: usize,
        alpha: ScalarArg<T>,
        x: VectorBatch<T>,
        y: VectorBatch<T>,
        a: MatrixBatch<T>,
        batch_count: usize,
    );

    /// Single-matrix triangular solve, member 0 of `a` and `b`
    ///
    /// `B := alpha · op(A)⁻¹ · B` (left) or `B := alpha · B · op(A)⁻¹` (right),
    /// B `m × n`.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn trsm<T: Scalar>(
        &self,
        client: &R::Client,
        side: Side,
        fill: Fill,
        op: Op,
        diag: Diag,
        m: usize,
        n: usize,
        alpha: T,
        a: MatrixBatch<T>,
        b: MatrixBatch<T>,
    );

    /// Hermitian rank-k update of one triangle of C (`n × n`)
    ///
    /// `C := alpha · A · Aᴴ + beta · C` (`op == NoTrans`, A `n × k`) or
    /// `C := alpha · Aᴴ · A + beta · C` (A `k × n`). Real types treat `ConjTrans`
    /// as `Trans`, which makes this syrk.
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn herk<T: Scalar>(
        &self,
        client: &R::Client,
        fill: Fill,
        op: Op,
        n: usize,
        k: usize,
        alpha: T::Real,
        a: MatrixBatch<T>,
        beta: T::Real,
        c: MatrixBatch<T>,
        batch_count: usize,
    );

    /// `C := alpha · op(A) · op(B) + beta · C` with C `m × n`, inner dimension `k`
    ///
    /// # Safety
    /// See the trait documentation.
    unsafe fn gemm<T: Scalar>(
        &self,
        client: &R::Client,
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
    );
}

/// Member base addresses of a batch, fetched to the host once per driver call
///
/// Only pointer batches need the fetch; strided batches compute their bases.
#[derive(Debug, Clone)]
pub struct HostMembers {
    bases: Vec<u64>,
}

impl HostMembers {
    /// Resolve the members of `a`
    pub fn resolve<R: Runtime, T>(client: &R::Client, a: &MatrixBatch<T>, batch_count: usize) -> Self {
        if a.is_pointer_batched() {
            // The pointer array must be final before it is read back
            client.synchronize();
        }
        Self {
            bases: a.member_bases::<R>(client.device(), batch_count),
        }
    }

    /// Number of members
    #[inline]
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Whether there are no members
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }
}

/// Batched triangular solve
///
/// Providers expose only a single-matrix `trsm`, so each member is issued from a
/// host loop using the addresses in `members`. Both operands must belong to the
/// same matrix batch that `members` was resolved from.
///
/// # Safety
/// Same contract as [`Blas::trsm`] for every member.
#[allow(clippy::too_many_arguments)]
pub unsafe fn trsm_batched<R, B, T>(
    blas: &B,
    client: &R::Client,
    members: &HostMembers,
    side: Side,
    fill: Fill,
    op: Op,
    diag: Diag,
    m: usize,
    n: usize,
    alpha: T,
    a: MatrixBatch<T>,
    b: MatrixBatch<T>,
) where
    R: Runtime,
    B: Blas<R>,
    T: Scalar,
{
    if m == 0 || n == 0 {
        return;
    }
    for &base in &members.bases {
        unsafe {
            blas.trsm(
                client,
                side,
                fill,
                op,
                diag,
                m,
                n,
                alpha,
                a.with_member_base(base),
                b.with_member_base(base),
            );
        }
    }
}
