//! Error types for numr-lapack
//!
//! Call-level failures only. Numerical outcomes (a singular matrix, a minor that is
//! not positive definite) are not errors: they are written to the per-member info
//! vector and the call still returns `Ok(())`.

use thiserror::Error;

/// Result type alias using numr-lapack's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported synchronously by a solver call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A required device address was null
    #[error("Invalid pointer: '{arg}' is null")]
    InvalidPointer {
        /// The argument name
        arg: &'static str,
    },

    /// Negative dimension, leading dimension too small, negative stride or batch count
    #[error("Invalid size '{arg}': {reason}")]
    InvalidSize {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Operation selector not valid for the scalar type
    #[error("Invalid value '{arg}': {reason}")]
    InvalidValue {
        /// The argument name
        arg: &'static str,
        /// Reason for invalidity
        reason: String,
    },

    /// Workspace acquisition failed
    #[error("Out of memory: failed to allocate {size} bytes")]
    OutOfMemory {
        /// Requested size in bytes
        size: usize,
    },
}

impl Error {
    /// Create an invalid pointer error
    pub fn null(arg: &'static str) -> Self {
        Self::InvalidPointer { arg }
    }

    /// Create an invalid size error
    pub fn invalid_size(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidSize {
            arg,
            reason: reason.into(),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(arg: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            arg,
            reason: reason.into(),
        }
    }

    /// Flat status code for this error
    pub fn status(&self) -> Status {
        match self {
            Self::InvalidPointer { .. } => Status::InvalidPointer,
            Self::InvalidSize { .. } => Status::InvalidSize,
            Self::InvalidValue { .. } => Status::InvalidValue,
            Self::OutOfMemory { .. } => Status::MemoryError,
        }
    }
}

/// Flat status taxonomy, for callers that forward codes across an ABI boundary
///
/// A borrowed [`Handle`](crate::api::Handle) is always valid, so `InvalidHandle` is
/// never produced by this crate; the code is kept so the numbering matches other
/// solver libraries.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum Status {
    /// The call completed
    Success = 0,
    /// The context handle was invalid
    InvalidHandle = 1,
    /// A required pointer was null
    InvalidPointer = 3,
    /// A size argument was invalid
    InvalidSize = 4,
    /// Workspace could not be acquired
    MemoryError = 5,
    /// An operation selector was invalid
    InvalidValue = 11,
}

impl<T> From<&Result<T>> for Status {
    fn from(result: &Result<T>) -> Self {
        match result {
            Ok(_) => Status::Success,
            Err(e) => e.status(),
        }
    }
}
