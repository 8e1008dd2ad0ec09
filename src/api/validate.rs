//! Argument checks shared by the entry points
//!
//! Every entry point checks sizes, then pointers, then operation values, and
//! nothing is written before all checks pass.

use crate::batch::{Layout, MatrixArg, VectorArg};
use crate::blas::Op;
use crate::dtype::Scalar;
use crate::error::{Error, Result};

/// A dimension argument, which must be non-negative
pub(crate) fn dim(arg: &'static str, value: i32) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::invalid_size(arg, format!("{arg} ({value}) < 0")))
}

/// A batch count, which must be non-negative
pub(crate) fn batch_count(value: i32) -> Result<usize> {
    dim("batch_count", value)
}

/// Leading dimension and layout of a matrix argument with `rows` addressed rows
pub(crate) fn matrix<T>(
    ld_arg: &'static str,
    stride_arg: &'static str,
    a: &MatrixArg<T>,
    rows: usize,
    batch_count: usize,
) -> Result<()> {
    let min_ld = rows.max(1);
    if a.ld() < 0 || (a.ld() as usize) < min_ld {
        return Err(Error::invalid_size(
            ld_arg,
            format!("{ld_arg} ({}) < max(1, {rows})", a.ld()),
        ));
    }
    match a.layout() {
        Layout::Strided { stride } if stride < 0 => Err(Error::invalid_size(
            stride_arg,
            format!("{stride_arg} ({stride}) < 0"),
        )),
        Layout::Single if batch_count > 1 => Err(Error::invalid_size(
            "batch_count",
            format!("a single matrix cannot hold {batch_count} members"),
        )),
        Layout::Strided { stride: 0 } if batch_count > 1 => Err(Error::invalid_size(
            stride_arg,
            format!("{stride_arg} (0) aliases {batch_count} members"),
        )),
        _ => Ok(()),
    }
}

/// Stride of a per-member vector argument
pub(crate) fn vector<T>(stride_arg: &'static str, v: &VectorArg<T>, batch_count: usize) -> Result<()> {
    match v.stride() {
        s if s < 0 => Err(Error::invalid_size(stride_arg, format!("{stride_arg} ({s}) < 0"))),
        0 if batch_count > 1 => Err(Error::invalid_size(
            stride_arg,
            format!("{stride_arg} (0) aliases {batch_count} members"),
        )),
        _ => Ok(()),
    }
}

/// A device address, which must not be null unless the batch is empty
pub(crate) fn pointer(arg: &'static str, addr: u64, batch_count: usize) -> Result<()> {
    if batch_count > 0 && addr == 0 {
        return Err(Error::null(arg));
    }
    Ok(())
}

/// Transposition kind against the scalar type
///
/// Complex types apply `ConjTrans` and reject `Trans`; real types the reverse.
pub(crate) fn op<T: Scalar>(op: Op) -> Result<()> {
    let complex = T::DTYPE.is_complex();
    match op {
        Op::Trans if complex => Err(Error::invalid_value(
            "trans",
            format!("transpose is not defined for {}, use ConjTrans", T::DTYPE),
        )),
        Op::ConjTrans if !complex => Err(Error::invalid_value(
            "trans",
            format!("conjugate transpose is not defined for {}, use Trans", T::DTYPE),
        )),
        _ => Ok(()),
    }
}

/// Two matrix arguments that are passed together to the same primitives
pub(crate) fn same_batch_mode<T>(a: &MatrixArg<T>, c: &MatrixArg<T>) -> Result<()> {
    let pointers = |m: &MatrixArg<T>| m.layout() == Layout::Pointers;
    if pointers(a) != pointers(c) {
        return Err(Error::invalid_value(
            "c",
            "a and c must both be pointer-batched or both be strided",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::Complex64;

    #[test]
    fn test_dims() {
        assert_eq!(dim("m", 3).unwrap(), 3);
        assert_eq!(dim("m", -1).unwrap_err().status(), crate::error::Status::InvalidSize);
        assert!(batch_count(-2).is_err());
    }

    #[test]
    fn test_leading_dimension() {
        let mut data = [0f32; 9];
        let a = MatrixArg::single(data.as_mut_ptr(), 3);
        assert!(matrix("lda", "stride_a", &a, 3, 1).is_ok());
        assert!(matrix("lda", "stride_a", &a, 4, 1).is_err());
        // An empty matrix still needs ld >= 1
        let a0 = MatrixArg::single(data.as_mut_ptr(), 0);
        assert!(matrix("lda", "stride_a", &a0, 0, 1).is_err());
        assert!(matrix("lda", "stride_a", &a, 3, 2).is_err());
        let s = MatrixArg::strided(data.as_mut_ptr(), 3, -9);
        assert_eq!(
            matrix("lda", "stride_a", &s, 3, 2).unwrap_err(),
            Error::invalid_size("stride_a", "stride_a (-9) < 0")
        );
    }

    #[test]
    fn test_zero_stride() {
        let mut data = [0f64; 4];
        let a = MatrixArg::strided(data.as_mut_ptr(), 2, 0);
        assert!(matrix("lda", "stride_a", &a, 2, 1).is_ok());
        assert_eq!(
            matrix("lda", "stride_a", &a, 2, 3).unwrap_err(),
            Error::invalid_size("stride_a", "stride_a (0) aliases 3 members")
        );

        let mut pivots = [0i32; 2];
        let p = VectorArg::single(pivots.as_mut_ptr());
        assert!(vector("stride_p", &p, 1).is_ok());
        assert!(vector("stride_p", &p, 0).is_ok());
        assert!(vector("stride_p", &p, 2).is_err());
    }

    #[test]
    fn test_op_against_type() {
        assert!(op::<f64>(Op::Trans).is_ok());
        assert!(op::<f64>(Op::ConjTrans).is_err());
        assert!(op::<Complex64>(Op::ConjTrans).is_ok());
        assert!(op::<Complex64>(Op::Trans).is_err());
        assert!(op::<Complex64>(Op::NoTrans).is_ok());
    }

    #[test]
    fn test_pointer() {
        assert!(pointer("a", 0, 0).is_ok());
        assert!(pointer("a", 0x40, 2).is_ok());
        assert_eq!(pointer("a", 0, 1).unwrap_err(), Error::null("a"));
    }
}
