//! Matrix and vector batch descriptors
//!
//! A batch is `batch_count` same-shaped column-major matrices stored in one of
//! three ways:
//!
//! - a single matrix (stride 0, `batch_count == 1`)
//! - strided-batched: one allocation, member `b` starts `b * stride` elements in
//! - pointer-batched: a device array of `batch_count` member addresses
//!
//! Caller-facing arguments ([`MatrixArg`], [`VectorArg`]) carry the typed device
//! pointers and raw, signed values a caller passes and are validated by the API
//! shell. The solvers and the
//! primitive provider work on the validated descriptors ([`MatrixBatch`],
//! [`VectorBatch`]), which add an element offset ("shift") so sub-blocks can be
//! addressed without touching the base address.

use crate::runtime::Runtime;
use std::marker::PhantomData;

/// How a caller stores the members of a batch
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Layout {
    /// One matrix
    Single,
    /// Members `stride` elements apart in one allocation
    Strided {
        /// Elements between the starts of consecutive members
        stride: i64,
    },
    /// Device array of member addresses
    Pointers,
}

/// Caller-provided matrix argument
#[derive(Debug)]
pub struct MatrixArg<T> {
    ptr: u64,
    ld: i32,
    layout: Layout,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for MatrixArg<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatrixArg<T> {}

impl<T> MatrixArg<T> {
    /// A single matrix at `ptr` with leading dimension `ld`
    pub fn single(ptr: *mut T, ld: i32) -> Self {
        Self {
            ptr: ptr as u64,
            ld,
            layout: Layout::Single,
            _marker: PhantomData,
        }
    }

    /// Strided batch starting at `ptr`
    ///
    /// Members must not overlap: a `stride` of 0 is rejected for more than one
    /// member, and a positive stride below the member footprint is undefined
    /// behavior.
    pub fn strided(ptr: *mut T, ld: i32, stride: i64) -> Self {
        Self {
            ptr: ptr as u64,
            ld,
            layout: Layout::Strided { stride },
            _marker: PhantomData,
        }
    }

    /// Pointer batch: `array` is a device array of member addresses
    pub fn pointers(array: *const *mut T, ld: i32) -> Self {
        Self {
            ptr: array as u64,
            ld,
            layout: Layout::Pointers,
            _marker: PhantomData,
        }
    }

    /// Device address of the base, or of the pointer array for pointer batches
    #[inline]
    pub fn addr(&self) -> u64 {
        self.ptr
    }

    /// Leading dimension
    #[inline]
    pub fn ld(&self) -> i32 {
        self.ld
    }

    /// Storage layout
    #[inline]
    pub fn layout(&self) -> Layout {
        self.layout
    }

    /// Validated descriptor. `ld` and any stride must already be known non-negative.
    pub(crate) fn to_batch(self) -> MatrixBatch<T> {
        let ld = self.ld as usize;
        match self.layout {
            Layout::Single => MatrixBatch::strided(self.ptr, ld, 0),
            Layout::Strided { stride } => MatrixBatch::strided(self.ptr, ld, stride as usize),
            Layout::Pointers => MatrixBatch::pointers(self.ptr, ld),
        }
    }
}

/// Caller-provided per-member vector (tau scalars or pivot indices)
///
/// Always contiguous within a member, members `stride` elements apart, also for
/// pointer-batched matrices.
#[derive(Debug)]
pub struct VectorArg<T> {
    ptr: u64,
    stride: i64,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for VectorArg<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VectorArg<T> {}

impl<T> VectorArg<T> {
    /// Vector for a single matrix
    pub fn single(ptr: *mut T) -> Self {
        Self::strided(ptr, 0)
    }

    /// Per-member vectors `stride` elements apart
    pub fn strided(ptr: *mut T, stride: i64) -> Self {
        Self {
            ptr: ptr as u64,
            stride,
            _marker: PhantomData,
        }
    }

    /// Device address of the first vector
    #[inline]
    pub fn addr(&self) -> u64 {
        self.ptr
    }

    /// Stride between members
    #[inline]
    pub fn stride(&self) -> i64 {
        self.stride
    }

    pub(crate) fn to_batch(self) -> VectorBatch<T> {
        VectorBatch::strided(self.ptr, 1, self.stride.max(0) as usize)
    }
}

/// How a validated descriptor finds member `b`
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Addressing {
    /// `base + b * stride` elements
    Strided(usize),
    /// `base` is a device array of member addresses
    Pointers,
}

#[inline]
unsafe fn resolve<T>(base: u64, addressing: Addressing, shift: usize, b: usize) -> *mut T {
    match addressing {
        Addressing::Strided(stride) => unsafe { (base as *mut T).add(b * stride + shift) },
        Addressing::Pointers => unsafe {
            let array = base as *const u64;
            (*array.add(b) as *mut T).add(shift)
        },
    }
}

/// Validated batch of column-major matrices
#[derive(Debug)]
pub struct MatrixBatch<T> {
    base: u64,
    shift: usize,
    ld: usize,
    addressing: Addressing,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for MatrixBatch<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatrixBatch<T> {}

impl<T> MatrixBatch<T> {
    /// Strided batch; `stride` 0 addresses the same matrix for every member
    pub fn strided(base: u64, ld: usize, stride: usize) -> Self {
        Self {
            base,
            shift: 0,
            ld,
            addressing: Addressing::Strided(stride),
            _marker: PhantomData,
        }
    }

    /// Pointer batch over the device array at `array`
    pub fn pointers(array: u64, ld: usize) -> Self {
        Self {
            base: array,
            shift: 0,
            ld,
            addressing: Addressing::Pointers,
            _marker: PhantomData,
        }
    }

    /// Sub-block starting at row `i`, column `j`
    #[inline]
    pub fn at(self, i: usize, j: usize) -> Self {
        Self {
            shift: self.shift + i + j * self.ld,
            ..self
        }
    }

    /// Column vector starting at (i, j)
    #[inline]
    pub fn column(self, i: usize, j: usize) -> VectorBatch<T> {
        let m = self.at(i, j);
        VectorBatch {
            base: m.base,
            shift: m.shift,
            inc: 1,
            addressing: m.addressing,
            _marker: PhantomData,
        }
    }

    /// Row vector starting at (i, j)
    #[inline]
    pub fn row(self, i: usize, j: usize) -> VectorBatch<T> {
        let m = self.at(i, j);
        VectorBatch {
            base: m.base,
            shift: m.shift,
            inc: m.ld,
            addressing: m.addressing,
            _marker: PhantomData,
        }
    }

    /// Leading dimension
    #[inline]
    pub fn ld(&self) -> usize {
        self.ld
    }

    /// Element offset applied to every member
    #[inline]
    pub fn shift(&self) -> usize {
        self.shift
    }

    /// Addressing mode
    #[inline]
    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// Whether members are reached through a pointer array
    #[inline]
    pub fn is_pointer_batched(&self) -> bool {
        self.addressing == Addressing::Pointers
    }

    /// Address of element (0, 0) of the sub-block in member `b`
    ///
    /// # Safety
    /// For pointer batches the pointer array must hold at least `b + 1` valid
    /// addresses. The result is only dereferenceable if the member allocation
    /// covers the addressed block.
    #[inline]
    pub unsafe fn member(&self, b: usize) -> *mut T {
        unsafe { resolve(self.base, self.addressing, self.shift, b) }
    }

    /// Host-side copy of the member base addresses, shift not applied
    ///
    /// For pointer batches this reads the device pointer array, a synchronization
    /// point.
    pub fn member_bases<R: Runtime>(&self, device: &R::Device, batch_count: usize) -> Vec<u64> {
        match self.addressing {
            Addressing::Strided(stride) => {
                let bytes = (stride * std::mem::size_of::<T>()) as u64;
                (0..batch_count as u64).map(|b| self.base + b * bytes).collect()
            }
            Addressing::Pointers => {
                let mut bases = vec![0u64; batch_count];
                R::copy_from_device(self.base, bytemuck::cast_slice_mut(&mut bases), device);
                bases
            }
        }
    }

    /// The same view anchored on one member at `base`
    #[inline]
    pub fn with_member_base(self, base: u64) -> Self {
        Self {
            base,
            addressing: Addressing::Strided(0),
            ..self
        }
    }
}

/// Validated batch of strided vectors
#[derive(Debug)]
pub struct VectorBatch<T> {
    base: u64,
    shift: usize,
    inc: usize,
    addressing: Addressing,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for VectorBatch<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VectorBatch<T> {}

impl<T> VectorBatch<T> {
    /// Member vectors `stride` elements apart, elements `inc` apart
    pub fn strided(base: u64, inc: usize, stride: usize) -> Self {
        Self {
            base,
            shift: 0,
            inc,
            addressing: Addressing::Strided(stride),
            _marker: PhantomData,
        }
    }

    /// One value per member, packed: member `b` at `base + b`
    pub fn per_member(base: u64) -> Self {
        Self::strided(base, 1, 1)
    }

    /// Same value for every member
    pub fn broadcast(base: u64) -> Self {
        Self::strided(base, 1, 0)
    }

    /// Vectors reached through a device pointer array
    pub fn pointers(array: u64, inc: usize) -> Self {
        Self {
            base: array,
            shift: 0,
            inc,
            addressing: Addressing::Pointers,
            _marker: PhantomData,
        }
    }

    /// The vector starting `k` elements further along
    #[inline]
    pub fn offset(self, k: usize) -> Self {
        Self {
            shift: self.shift + k * self.inc,
            ..self
        }
    }

    /// Element increment
    #[inline]
    pub fn inc(&self) -> usize {
        self.inc
    }

    /// Addressing mode
    #[inline]
    pub fn addressing(&self) -> Addressing {
        self.addressing
    }

    /// Address of element 0 in member `b`
    ///
    /// # Safety
    /// Same contract as [`MatrixBatch::member`].
    #[inline]
    pub unsafe fn member(&self, b: usize) -> *mut T {
        unsafe { resolve(self.base, self.addressing, self.shift, b) }
    }

    /// Address of element `i` in member `b`
    ///
    /// # Safety
    /// Same contract as [`MatrixBatch::member`].
    #[inline]
    pub unsafe fn get(&self, b: usize, i: usize) -> *mut T {
        unsafe { self.member(b).add(i * self.inc) }
    }
}

/// Scalar operand of a primitive call
///
/// Replaces a process-wide "pointer mode": every call states whether its scalar
/// is an immediate host value or lives in device memory, per member.
#[derive(Debug)]
pub enum ScalarArg<T> {
    /// Immediate value shared by all members
    Host(T),
    /// Device value, member `b` reads element 0 of vector `b`
    Device(VectorBatch<T>),
}

impl<T: Copy> Clone for ScalarArg<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: Copy> Copy for ScalarArg<T> {}

impl<T: Copy> ScalarArg<T> {
    /// Value seen by member `b`
    ///
    /// # Safety
    /// A device scalar must be readable for member `b`.
    #[inline]
    pub unsafe fn value(&self, b: usize) -> T {
        match self {
            Self::Host(v) => *v,
            Self::Device(v) => unsafe { *v.member(b) },
        }
    }
}
