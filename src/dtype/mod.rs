//! Scalar type system for the solvers
//!
//! Every routine is written once against the [`Scalar`] capability trait and
//! instantiated for the four working precisions. [`DType`] is the runtime tag for
//! those precisions, used where a decision depends on the type rather than on
//! values (operation validation, logging, workspace sizing).

pub mod complex;
mod element;

pub use complex::{Complex64, Complex128};
pub use element::{Element, RealScalar, Scalar};

use std::fmt;

/// Working scalar type of a solver call
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DType {
    /// 32-bit real
    F32 = 0,
    /// 64-bit real
    F64 = 1,
    /// Complex with f32 parts
    Complex64 = 2,
    /// Complex with f64 parts
    Complex128 = 3,
}

impl DType {
    /// Size of one element in bytes
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            Self::F32 => 4,
            Self::F64 | Self::Complex64 => 8,
            Self::Complex128 => 16,
        }
    }

    /// Returns true for the complex types
    #[inline]
    pub const fn is_complex(self) -> bool {
        matches!(self, Self::Complex64 | Self::Complex128)
    }

    /// Real component type (identity for real types)
    #[inline]
    pub const fn real_dtype(self) -> Self {
        match self {
            Self::F32 | Self::Complex64 => Self::F32,
            Self::F64 | Self::Complex128 => Self::F64,
        }
    }

    /// LAPACK precision prefix: `s`, `d`, `c` or `z`
    #[inline]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::F32 => "s",
            Self::F64 => "d",
            Self::Complex64 => "c",
            Self::Complex128 => "z",
        }
    }

    /// Short name for display
    pub const fn short_name(self) -> &'static str {
        match self {
            Self::F32 => "f32",
            Self::F64 => "f64",
            Self::Complex64 => "c64",
            Self::Complex128 => "c128",
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_name())
    }
}
