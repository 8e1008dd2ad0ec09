//! Householder reflector construction

use super::Ctx;
use crate::batch::{ScalarArg, VectorBatch};
use crate::blas::Blas;
use crate::dtype::{Element, RealScalar, Scalar};
use crate::runtime::Runtime;
use crate::workspace::elem_offset;
use std::mem::size_of;

/// Generate `H = I - tau · v · vᴴ` with `Hᴴ · [alpha; x] = [beta; 0]`, beta real
///
/// `alpha` is the head element and `x` the `n - 1` tail elements of each member's
/// vector. On return the head holds beta, the tail holds `v[1..]` (v[0] = 1
/// implicitly) and `tau` the reflector scalar. When the tail is zero and alpha is
/// real, tau is zero and H is the identity.
///
/// Workspace: `work` holds one norm and one scale factor per member.
///
/// # Safety
/// See the [module documentation](super).
pub(crate) unsafe fn larfg<R: Runtime, B: Blas<R>, T: Scalar>(
    ctx: &Ctx<'_, R, B>,
    n: usize,
    alpha: VectorBatch<T>,
    x: VectorBatch<T>,
    tau: VectorBatch<T>,
    work: u64,
) {
    let bc = ctx.batch_count;
    if n == 0 || bc == 0 {
        return;
    }

    // Norms are stored in T-sized slots
    let slot = size_of::<T>() / size_of::<T::Real>();
    let norms = VectorBatch::<T::Real>::strided(work, 1, slot);
    let factors = VectorBatch::<T>::per_member(elem_offset::<T>(work, bc));

    unsafe {
        ctx.blas.nrm2(ctx.client, n - 1, x, norms, bc);

        ctx.launch(|b| {
            let head = alpha.member(b);
            let (t, beta, factor) = reflector(*head, *norms.member(b));
            *tau.member(b) = t;
            *head = T::from_real(beta);
            *factors.member(b) = factor;
        });

        ctx.blas
            .scal(ctx.client, n - 1, ScalarArg::Device(factors), x, bc);
    }
}

/// `(tau, beta, 1 / (alpha - beta))` for head `alpha` and tail norm `xnorm`
///
/// The identity reflector returns `(0, alpha, 1)`.
fn reflector<T: Scalar>(alpha: T, xnorm: T::Real) -> (T, T::Real, T) {
    let zero = T::Real::zero();
    let (re, im) = (alpha.re(), alpha.im());
    if xnorm == zero && im == zero {
        return (T::zero(), re, T::one());
    }

    // sqrt(re² + im² + xnorm²) without overflow in the squares
    let big = max(max(re.abs(), im.abs()), xnorm);
    let (r, i, x) = (re / big, im / big, xnorm / big);
    let norm = big * (r * r + i * i + x * x).sqrt();
    let beta = if re >= zero { -norm } else { norm };

    let tau = T::from_parts((beta - re) / beta, -im / beta);
    let factor = T::one() / (alpha - T::from_real(beta));
    (tau, beta, factor)
}

#[inline]
fn max<F: PartialOrd>(a: F, b: F) -> F {
    if b > a { b } else { a }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Complex128;

    #[test]
    fn test_real_reflector_annihilates() {
        // [3; 4] -> beta = -5
        let (tau, beta, factor) = reflector(3.0f64, 4.0);
        assert_eq!(beta, -5.0);
        assert!((tau - 1.6).abs() < 1e-15);
        // v = [1, 4 / (3 + 5)]; H [3; 4] = [3; 4] - tau v (vᵀ [3; 4])
        let v1 = 4.0 * factor;
        let proj = 3.0 + v1 * 4.0;
        assert!((3.0 - tau * proj - beta).abs() < 1e-14);
        assert!((4.0 - tau * v1 * proj).abs() < 1e-14);
    }

    #[test]
    fn test_identity_when_tail_zero() {
        let (tau, beta, factor) = reflector(-2.0f32, 0.0);
        assert_eq!(tau, 0.0);
        assert_eq!(beta, -2.0);
        assert_eq!(factor, 1.0);
    }

    #[test]
    fn test_complex_head_made_real() {
        // A single complex element still needs a reflector to make it real
        let alpha = Complex128::new(0.0, 2.0);
        let (tau, beta, _) = reflector(alpha, 0.0);
        assert_eq!(beta, -2.0);
        assert_eq!(tau, Complex128::new(1.0, 1.0));
        // Hᴴ alpha = (1 - conj(tau)) alpha = beta
        let h = (Complex128::ONE - tau.conj()) * alpha;
        assert!((h.re - beta).abs() < 1e-15 && h.im.abs() < 1e-15);
    }
}
