//! Error types.

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelError {
    /// Leaf index is not below the current leaf count.
    OutOfRange { index: usize, len: usize },
    /// The tree has no leaves, so it has no root.
    Empty,
    /// Leaves were replayed but the interior levels have not been rebuilt yet.
    PendingRebuild,
    /// A textual digest was not 32 bytes of hex.
    InvalidDigest,
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelError::OutOfRange { index, len } => {
                write!(f, "Index out of bounds: index {} but tree has {} leaves", index, len)
            }
            KernelError::Empty => write!(f, "Tree is empty"),
            KernelError::PendingRebuild => write!(f, "Tree is awaiting rebuild after replay"),
            KernelError::InvalidDigest => write!(f, "Invalid digest: expected 32 hex-encoded bytes"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KernelError {}

pub type KernelResult<T> = core::result::Result<T, KernelError>;
