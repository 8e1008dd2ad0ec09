//! Element and scalar capability traits

use super::complex::{Complex64, Complex128};
use super::DType;
use bytemuck::{Pod, Zeroable};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// Trait for types that can live in a solver buffer
///
/// Connects Rust's type system to the runtime [`DType`] tag.
///
/// # Bounds
/// - `Copy + Send + Sync + 'static` - values cross lane boundaries freely
/// - `Pod + Zeroable` - safe memory transmutation (bytemuck) for device copies
/// - `Add + Sub + Mul + Div + Neg` - field arithmetic (Output = Self)
/// - `PartialOrd` - for complex types this compares magnitudes
pub trait Element:
    Copy
    + Clone
    + Debug
    + Send
    + Sync
    + Pod
    + Zeroable
    + 'static
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + PartialOrd
{
    /// The corresponding DType for this Rust type
    const DTYPE: DType;

    /// Convert from f64 (imaginary part zero for complex types)
    fn from_f64(v: f64) -> Self;

    /// Zero value
    fn zero() -> Self;

    /// One value
    fn one() -> Self;
}

/// Numeric capability set the factorization algorithms are written against
///
/// For real types `conj` is the identity and `im` is zero, so a single algorithm
/// body serves the real and the complex variants.
pub trait Scalar: Element {
    /// Real component type
    type Real: RealScalar;

    /// Complex conjugate (identity for real types)
    fn conj(self) -> Self;

    /// Real part
    fn re(self) -> Self::Real;

    /// Imaginary part (zero for real types)
    fn im(self) -> Self::Real;

    /// Build from parts; real types drop `im`
    fn from_parts(re: Self::Real, im: Self::Real) -> Self;

    /// Embed a real value
    #[inline]
    fn from_real(re: Self::Real) -> Self {
        Self::from_parts(re, Self::Real::zero())
    }

    /// |re| + |im|, the magnitude BLAS uses for pivot search
    fn abs1(self) -> Self::Real;

    /// Squared modulus
    fn abs_sq(self) -> Self::Real;

    /// Multiply by a real factor
    fn scale(self, k: Self::Real) -> Self;

    /// Exact comparison against zero
    #[inline]
    fn is_zero(self) -> bool {
        self == Self::zero()
    }
}

/// Real working precision (f32 / f64)
pub trait RealScalar: Scalar<Real = Self> {
    /// Square root
    fn sqrt(self) -> Self;

    /// Absolute value
    fn abs(self) -> Self;

    /// NaN test
    fn is_nan(self) -> bool;
}

macro_rules! impl_real {
    ($t:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            #[inline]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn zero() -> Self {
                0.0
            }

            #[inline]
            fn one() -> Self {
                1.0
            }
        }

        impl Scalar for $t {
            type Real = $t;

            #[inline]
            fn conj(self) -> Self {
                self
            }

            #[inline]
            fn re(self) -> Self {
                self
            }

            #[inline]
            fn im(self) -> Self {
                0.0
            }

            #[inline]
            fn from_parts(re: Self, _im: Self) -> Self {
                re
            }

            #[inline]
            fn abs1(self) -> Self {
                self.abs()
            }

            #[inline]
            fn abs_sq(self) -> Self {
                self * self
            }

            #[inline]
            fn scale(self, k: Self) -> Self {
                self * k
            }
        }

        impl RealScalar for $t {
            #[inline]
            fn sqrt(self) -> Self {
                <$t>::sqrt(self)
            }

            #[inline]
            fn abs(self) -> Self {
                <$t>::abs(self)
            }

            #[inline]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }
        }
    };
}

impl_real!(f32, DType::F32);
impl_real!(f64, DType::F64);

macro_rules! impl_complex_scalar {
    ($t:ident, $float:ty, $dtype:expr) => {
        impl Element for $t {
            const DTYPE: DType = $dtype;

            #[inline]
            fn from_f64(v: f64) -> Self {
                $t::new(v as $float, 0.0)
            }

            #[inline]
            fn zero() -> Self {
                $t::ZERO
            }

            #[inline]
            fn one() -> Self {
                $t::ONE
            }
        }

        impl Scalar for $t {
            type Real = $float;

            #[inline]
            fn conj(self) -> Self {
                $t::conj(self)
            }

            #[inline]
            fn re(self) -> $float {
                self.re
            }

            #[inline]
            fn im(self) -> $float {
                self.im
            }

            #[inline]
            fn from_parts(re: $float, im: $float) -> Self {
                $t::new(re, im)
            }

            #[inline]
            fn abs1(self) -> $float {
                self.re.abs() + self.im.abs()
            }

            #[inline]
            fn abs_sq(self) -> $float {
                self.magnitude_squared()
            }

            #[inline]
            fn scale(self, k: $float) -> Self {
                $t::scale(self, k)
            }
        }
    };
}

impl_complex_scalar!(Complex64, f32, DType::Complex64);
impl_complex_scalar!(Complex128, f64, DType::Complex128);
