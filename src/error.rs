//! Error type for table construction and growth.

use core::alloc::Layout;
use core::fmt;

/// Errors surfaced by fallible table operations.
///
/// A failed probe chain on insert is not represented here: it means the
/// table's invariants are already broken, so it panics instead.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The allocator returned no memory for a bucket array of this layout.
    ///
    /// From an insert, the key and value passed in have been dropped;
    /// entries already in the table are unaffected.
    AllocFailed { layout: Layout },
    /// The bucket count does not fit a power of two or a valid layout.
    CapacityOverflow,
    /// Load factor outside the open interval `(0, 1)`.
    InvalidLoadFactor(f64),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::AllocFailed { layout } => write!(
                f,
                "bucket allocation failed: {} bytes (align {})",
                layout.size(),
                layout.align()
            ),
            Error::CapacityOverflow => write!(f, "bucket count overflow"),
            Error::InvalidLoadFactor(lf) => {
                write!(f, "invalid load factor {lf}: must be in (0, 1)")
            }
        }
    }
}

impl std::error::Error for Error {}
