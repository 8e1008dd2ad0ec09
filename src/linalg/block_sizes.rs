//! Panel widths of the blocked drivers

/// Below this order potrf runs the unblocked kernel; otherwise the panel width
pub const POTRF_POTF2_SWITCHSIZE: usize = 64;

/// Below this `min(m, n)` getrf runs the unblocked kernel; otherwise the panel width
pub const GETRF_GETF2_SWITCHSIZE: usize = 64;
