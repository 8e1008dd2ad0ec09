//! Workspace planning and scoped acquisition
//!
//! Every routine follows "size first, allocate second": a pure planner function
//! computes four region sizes from the problem shape, the API shell acquires them
//! as one [`Workspace`], and the regions are released when the guard drops, on
//! every exit path.
//!
//! | region | holds |
//! |---|---|
//! | `constants` | `{-1, 0, 1}` in the working scalar type |
//! | `work` | per-member algorithm scratch |
//! | `work_array` | member addresses into `work`, for pointer-batched calls |
//! | `scratch` | diagonal-save slot, pivot index or per-panel status |
//!
//! A size of zero means the region is not needed; its address is then null.

use crate::blas::Side;
use crate::dtype::Scalar;
use crate::error::{Error, Result};
use crate::linalg::block_sizes::{GETRF_GETF2_SWITCHSIZE, POTRF_POTF2_SWITCHSIZE};
use crate::runtime::{Allocator, DeviceBuffer};
use std::mem::size_of;

/// Byte sizes of the four workspace regions of one call
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkspaceSizes {
    /// Constants buffer
    pub constants: usize,
    /// Algorithm scratch
    pub work: usize,
    /// Array of per-member pointers into `work`
    pub work_array: usize,
    /// Small fixed-purpose buffer
    pub scratch: usize,
}

impl WorkspaceSizes {
    /// No workspace at all
    pub const EMPTY: Self = Self {
        constants: 0,
        work: 0,
        work_array: 0,
        scratch: 0,
    };

    /// Sum of all regions
    pub fn total(&self) -> usize {
        self.constants
            .saturating_add(self.work)
            .saturating_add(self.work_array)
            .saturating_add(self.scratch)
    }

    /// Region-wise maximum, for routines that run sub-steps one after another
    pub fn max(self, other: Self) -> Self {
        Self {
            constants: self.constants.max(other.constants),
            work: self.work.max(other.work),
            work_array: self.work_array.max(other.work_array),
            scratch: self.scratch.max(other.scratch),
        }
    }
}

/// Product of `factors` times `elem_size`, checked for overflow
fn bytes(factors: &[usize], elem_size: usize) -> Result<usize> {
    factors
        .iter()
        .try_fold(elem_size, |acc, &f| acc.checked_mul(f))
        .ok_or(Error::OutOfMemory { size: usize::MAX })
}

fn constants<T: Scalar>() -> usize {
    3 * size_of::<T>()
}

fn pointer_array(batch_count: usize, pointer_batched: bool) -> Result<usize> {
    if pointer_batched {
        bytes(&[batch_count], size_of::<u64>())
    } else {
        Ok(0)
    }
}

/// Reflector application to an `m × n` block
///
/// `work` holds one `w` vector per member (length n for the left side, m for the
/// right) followed by the negated tau of every member.
pub fn larf_workspace<T: Scalar>(
    side: Side,
    m: usize,
    n: usize,
    batch_count: usize,
    pointer_batched: bool,
) -> Result<WorkspaceSizes> {
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(WorkspaceSizes::EMPTY);
    }
    let w_len = match side {
        Side::Left => n,
        Side::Right => m,
    };
    let per_member = w_len.checked_add(1).ok_or(Error::OutOfMemory { size: usize::MAX })?;
    Ok(WorkspaceSizes {
        constants: constants::<T>(),
        work: bytes(&[batch_count, per_member], size_of::<T>())?,
        work_array: pointer_array(batch_count, pointer_batched)?,
        scratch: 0,
    })
}

/// Reflector construction over a vector of length `n`: norm plus scale factor
pub fn larfg_workspace<T: Scalar>(n: usize, batch_count: usize) -> Result<WorkspaceSizes> {
    if n == 0 || batch_count == 0 {
        return Ok(WorkspaceSizes::EMPTY);
    }
    Ok(WorkspaceSizes {
        constants: constants::<T>(),
        work: bytes(&[batch_count, 2], size_of::<T>())?,
        work_array: 0,
        scratch: 0,
    })
}

fn householder_workspace<T: Scalar>(
    side: Side,
    m: usize,
    n: usize,
    reflector_len: usize,
    batch_count: usize,
    pointer_batched: bool,
) -> Result<WorkspaceSizes> {
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(WorkspaceSizes::EMPTY);
    }
    let sizes = larf_workspace::<T>(side, m, n, batch_count, pointer_batched)?
        .max(larfg_workspace::<T>(reflector_len, batch_count)?);
    Ok(WorkspaceSizes {
        scratch: bytes(&[batch_count], size_of::<T>())?,
        ..sizes
    })
}

/// Unblocked QR of an `m × n` matrix
pub fn geqr2_workspace<T: Scalar>(
    m: usize,
    n: usize,
    batch_count: usize,
    pointer_batched: bool,
) -> Result<WorkspaceSizes> {
    householder_workspace::<T>(Side::Left, m, n, m, batch_count, pointer_batched)
}

/// Unblocked LQ of an `m × n` matrix
pub fn gelq2_workspace<T: Scalar>(
    m: usize,
    n: usize,
    batch_count: usize,
    pointer_batched: bool,
) -> Result<WorkspaceSizes> {
    householder_workspace::<T>(Side::Right, m, n, n, batch_count, pointer_batched)
}

/// Applying `k` stored reflectors to an `m × n` matrix C
///
/// Shared by the column-wise (orm2r), row-wise (orml2) and bidiagonal (ormbr)
/// updates; `pointer_batched` refers to C.
pub fn ormxx_workspace<T: Scalar>(
    side: Side,
    m: usize,
    n: usize,
    k: usize,
    batch_count: usize,
    pointer_batched: bool,
) -> Result<WorkspaceSizes> {
    if m == 0 || n == 0 || k == 0 || batch_count == 0 {
        return Ok(WorkspaceSizes::EMPTY);
    }
    let sizes = larf_workspace::<T>(side, m, n, batch_count, pointer_batched)?;
    Ok(WorkspaceSizes {
        scratch: bytes(&[batch_count], size_of::<T>())?,
        ..sizes
    })
}

/// Unblocked Cholesky: dot products and reciprocal pivots, one each per member
pub fn potf2_workspace<T: Scalar>(n: usize, batch_count: usize) -> Result<WorkspaceSizes> {
    if n == 0 || batch_count == 0 {
        return Ok(WorkspaceSizes::EMPTY);
    }
    Ok(WorkspaceSizes {
        constants: constants::<T>(),
        work: bytes(&[batch_count, 2], size_of::<T>())?,
        work_array: 0,
        scratch: 0,
    })
}

/// Blocked Cholesky: potf2 at the panel width plus per-panel status
pub fn potrf_workspace<T: Scalar>(n: usize, batch_count: usize) -> Result<WorkspaceSizes> {
    if n < POTRF_POTF2_SWITCHSIZE {
        return potf2_workspace::<T>(n, batch_count);
    }
    if batch_count == 0 {
        return Ok(WorkspaceSizes::EMPTY);
    }
    Ok(WorkspaceSizes {
        scratch: bytes(&[batch_count], size_of::<i32>())?,
        ..potf2_workspace::<T>(POTRF_POTF2_SWITCHSIZE, batch_count)?
    })
}

/// Unblocked LU: reciprocal pivot and pivot index per member
pub fn getf2_workspace<T: Scalar>(m: usize, n: usize, batch_count: usize) -> Result<WorkspaceSizes> {
    if m == 0 || n == 0 || batch_count == 0 {
        return Ok(WorkspaceSizes::EMPTY);
    }
    Ok(WorkspaceSizes {
        constants: constants::<T>(),
        work: bytes(&[batch_count], size_of::<T>())?,
        work_array: 0,
        scratch: bytes(&[batch_count], size_of::<i32>())?,
    })
}

/// Whether getrf factors panel by panel
pub(crate) fn getrf_is_blocked(m: usize, n: usize) -> bool {
    m.min(n) >= GETRF_GETF2_SWITCHSIZE
}

/// Blocked LU: getf2 on a panel plus per-panel status next to the pivot index
pub fn getrf_workspace<T: Scalar>(m: usize, n: usize, batch_count: usize) -> Result<WorkspaceSizes> {
    if !getrf_is_blocked(m, n) {
        return getf2_workspace::<T>(m, n, batch_count);
    }
    if batch_count == 0 {
        return Ok(WorkspaceSizes::EMPTY);
    }
    Ok(WorkspaceSizes {
        scratch: bytes(&[batch_count, 2], size_of::<i32>())?,
        ..getf2_workspace::<T>(m, GETRF_GETF2_SWITCHSIZE, batch_count)?
    })
}

/// Device addresses of an acquired workspace
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Regions {
    /// Constants `{-1, 0, 1}`
    pub constants: u64,
    /// Algorithm scratch
    pub work: u64,
    /// Pointer array into `work`
    pub work_array: u64,
    /// Fixed-purpose buffer
    pub scratch: u64,
}

/// Address `count` elements of `T` past `base`
#[inline]
pub(crate) fn elem_offset<T>(base: u64, count: usize) -> u64 {
    base + (count * size_of::<T>()) as u64
}

/// Workspace held for the duration of one call
///
/// Acquisition is all-or-nothing: when a region fails to allocate, the regions
/// already acquired are released before the error is returned.
#[derive(Debug)]
pub struct Workspace<'a, A: Allocator> {
    constants: DeviceBuffer<'a, A>,
    work: DeviceBuffer<'a, A>,
    work_array: DeviceBuffer<'a, A>,
    scratch: DeviceBuffer<'a, A>,
}

impl<'a, A: Allocator> Workspace<'a, A> {
    /// Allocate every region of `sizes`
    pub fn acquire(allocator: &'a A, sizes: &WorkspaceSizes) -> Result<Self> {
        Ok(Self {
            constants: DeviceBuffer::new(allocator, sizes.constants)?,
            work: DeviceBuffer::new(allocator, sizes.work)?,
            work_array: DeviceBuffer::new(allocator, sizes.work_array)?,
            scratch: DeviceBuffer::new(allocator, sizes.scratch)?,
        })
    }

    /// Region addresses
    pub fn regions(&self) -> Regions {
        Regions {
            constants: self.constants.ptr(),
            work: self.work.ptr(),
            work_array: self.work_array.ptr(),
            scratch: self.scratch.ptr(),
        }
    }
}
