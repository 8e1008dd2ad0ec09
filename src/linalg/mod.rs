//! Batched factorization kernels and drivers
//!
//! Every routine here works on validated descriptors and a workspace that the
//! API shell has already planned and acquired: nothing in this module allocates
//! or reports call-level errors. Numerical failures go to the per-member info
//! vector.
//!
//! Routines are composed from two kinds of steps:
//!
//! - provider primitives ([`Blas`]) for the bulk linear algebra
//! - small lane kernels (pivot checks, sign/conjugation fixes, bookkeeping)
//!   launched through [`RuntimeClient::launch`], one lane per batch member
//!
//! # Safety
//!
//! All routines are `unsafe`: every descriptor must address memory that is valid
//! for the touched block of every member, and the workspace addresses must come
//! from a [`Workspace`](crate::workspace::Workspace) planned for the same call.

mod auxiliary;
pub mod block_sizes;
mod gelq2;
mod geqr2;
mod getf2;
mod getrf;
mod larf;
mod larfg;
mod orm2r;
mod orml2;
mod ormbr;
mod potf2;
mod potrf;
mod scoped;

pub(crate) use gelq2::gelq2;
pub(crate) use geqr2::geqr2;
pub(crate) use getf2::getf2;
pub(crate) use getrf::getrf;
pub(crate) use orm2r::orm2r;
pub(crate) use orml2::orml2;
pub(crate) use ormbr::ormbr;
pub use ormbr::Storev;
pub(crate) use potf2::potf2;
pub(crate) use potrf::potrf;

use crate::batch::{ScalarArg, VectorBatch};
use crate::blas::Blas;
use crate::dtype::Scalar;
use crate::runtime::{Runtime, RuntimeClient};
use crate::workspace::elem_offset;

/// Execution context of one solver call
pub(crate) struct Ctx<'a, R: Runtime, B: Blas<R>> {
    pub(crate) client: &'a R::Client,
    pub(crate) blas: &'a B,
    pub(crate) batch_count: usize,
    /// Device constants `{-1, 0, 1}` in the working scalar type
    pub(crate) constants: u64,
}

impl<'a, R: Runtime, B: Blas<R>> Ctx<'a, R, B> {
    pub(crate) fn new(client: &'a R::Client, blas: &'a B, batch_count: usize, constants: u64) -> Self {
        Self {
            client,
            blas,
            batch_count,
            constants,
        }
    }

    /// One lane per batch member
    #[inline]
    pub(crate) fn launch<F>(&self, kernel: F)
    where
        F: Fn(usize) + Send + Sync,
    {
        self.client.launch(self.batch_count, kernel);
    }

    fn constant<T: Scalar>(&self, index: usize) -> ScalarArg<T> {
        ScalarArg::Device(VectorBatch::broadcast(elem_offset::<T>(self.constants, index)))
    }

    pub(crate) fn minus_one<T: Scalar>(&self) -> ScalarArg<T> {
        self.constant(0)
    }

    pub(crate) fn zero<T: Scalar>(&self) -> ScalarArg<T> {
        self.constant(1)
    }

    pub(crate) fn one<T: Scalar>(&self) -> ScalarArg<T> {
        self.constant(2)
    }
}
