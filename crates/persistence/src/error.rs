use thiserror::Error;
use std::io;

#[derive(Error, Debug)]
pub enum PersistenceError {
    #[error("Invalid magic bytes in header")]
    InvalidMagic,
    #[error("Unsupported hash log version: {0}")]
    UnsupportedVersion(u32),
    #[error("Checksum mismatch at entry {sequence}: expected {expected}, found {found}")]
    ChecksumMismatch {
        sequence: u64,
        expected: u64,
        found: u64,
    },
    #[error("Sequence gap: expected entry {expected}, found {found}")]
    SequenceGap {
        expected: u64,
        found: u64,
    },
    #[error("Truncated hash log after {entries} complete entries")]
    Truncated { entries: u64 },
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, PersistenceError>;
