//! Temporary in-place edits that undo themselves
//!
//! Householder vectors are stored inside the factored matrix with an implicit
//! unit head, and complex variants need some vectors conjugated while they are
//! applied. Both edits are held by a guard and reverted on drop, so the matrix is
//! restored on every path out of the enclosing scope.

use super::auxiliary::lacgv;
use super::Ctx;
use crate::batch::VectorBatch;
use crate::blas::Blas;
use crate::dtype::Scalar;
use crate::runtime::Runtime;

/// Reflector view: the head element reads as one while the guard lives
pub(crate) struct ReflectorHead<'c, R: Runtime, B: Blas<R>, T: Scalar> {
    ctx: &'c Ctx<'c, R, B>,
    head: VectorBatch<T>,
    saved: VectorBatch<T>,
}

impl<'c, R: Runtime, B: Blas<R>, T: Scalar> ReflectorHead<'c, R, B, T> {
    /// Save element 0 of `head` into `saved` (one slot per member) and set it to one
    ///
    /// # Safety
    /// `head` and `saved` must be valid for every member until the guard drops.
    pub(crate) unsafe fn new(ctx: &'c Ctx<'c, R, B>, head: VectorBatch<T>, saved: VectorBatch<T>) -> Self {
        ctx.launch(|b| unsafe {
            let h = head.member(b);
            *saved.member(b) = *h;
            *h = T::one();
        });
        Self { ctx, head, saved }
    }
}

impl<R: Runtime, B: Blas<R>, T: Scalar> Drop for ReflectorHead<'_, R, B, T> {
    fn drop(&mut self) {
        let (head, saved) = (self.head, self.saved);
        self.ctx.launch(|b| unsafe { *head.member(b) = *saved.member(b) });
    }
}

/// `n` elements of a vector held conjugated while the guard lives
///
/// A no-op for real types.
pub(crate) struct Conjugated<'c, R: Runtime, B: Blas<R>, T: Scalar> {
    ctx: &'c Ctx<'c, R, B>,
    n: usize,
    x: VectorBatch<T>,
}

impl<'c, R: Runtime, B: Blas<R>, T: Scalar> Conjugated<'c, R, B, T> {
    /// # Safety
    /// `x` must be valid for `n` elements of every member until the guard drops.
    pub(crate) unsafe fn new(ctx: &'c Ctx<'c, R, B>, n: usize, x: VectorBatch<T>) -> Self {
        unsafe { lacgv(ctx, n, x) };
        Self { ctx, n, x }
    }
}

impl<R: Runtime, B: Blas<R>, T: Scalar> Drop for Conjugated<'_, R, B, T> {
    fn drop(&mut self) {
        unsafe { lacgv(self.ctx, self.n, self.x) };
    }
}
