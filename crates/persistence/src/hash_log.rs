// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Hash Log
//!
//! # File Format
//! ```text
//! [Header: 16 bytes][Entry: 48 bytes][Entry]...
//! ```
//!
//! Header: magic `MKLG`, version u32 LE, reserved u64.
//!
//! Entry: sequence u64 LE, leaf digest (32 bytes), CRC64 of sequence and
//! digest as u64 LE. Sequences start at 0 and have no gaps, so the
//! sequence of an entry is the index of its leaf.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use crc64fast::Digest as Crc64;
use merkle_kernel::{Digest, DIGEST_LEN};
use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::{Path, PathBuf};

use crate::error::{PersistenceError, Result};

pub const MAGIC: [u8; 4] = *b"MKLG";
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashLogHeader {
    pub version: u32,
}

impl Default for HashLogHeader {
    fn default() -> Self {
        Self { version: FORMAT_VERSION }
    }
}

impl HashLogHeader {
    pub const SIZE: usize = 16;

    pub fn to_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        buf[0..4].copy_from_slice(&MAGIC);
        buf[4..8].copy_from_slice(&self.version.to_le_bytes());
        // bytes 8..16 reserved
        buf
    }

    pub fn read_from<R: Read>(mut reader: R) -> Result<Self> {
        let mut buf = [0u8; Self::SIZE];
        reader.read_exact(&mut buf).map_err(|e| match e.kind() {
            io::ErrorKind::UnexpectedEof => PersistenceError::Truncated { entries: 0 },
            _ => PersistenceError::IoError(e),
        })?;

        if buf[0..4] != MAGIC {
            return Err(PersistenceError::InvalidMagic);
        }
        let version = Cursor::new(&buf[4..8]).read_u32::<LittleEndian>()?;
        if version != FORMAT_VERSION {
            return Err(PersistenceError::UnsupportedVersion(version));
        }
        Ok(Self { version })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashLogEntry {
    pub sequence: u64,
    pub hash: Digest,
}

impl HashLogEntry {
    pub const SIZE: usize = 8 + DIGEST_LEN + 8; // 48 bytes

    pub fn checksum(&self) -> u64 {
        let mut crc = Crc64::new();
        crc.write(&self.sequence.to_le_bytes());
        crc.write(self.hash.as_bytes());
        crc.sum64()
    }

    pub fn to_bytes(&self) -> Result<[u8; Self::SIZE]> {
        let mut buf = [0u8; Self::SIZE];
        let mut cursor = Cursor::new(&mut buf[..]);
        cursor.write_u64::<LittleEndian>(self.sequence)?;
        cursor.write_all(self.hash.as_bytes())?;
        cursor.write_u64::<LittleEndian>(self.checksum())?;
        Ok(buf)
    }

    pub fn decode(buf: &[u8; Self::SIZE]) -> Result<Self> {
        let mut cursor = Cursor::new(&buf[..]);
        let sequence = cursor.read_u64::<LittleEndian>()?;
        let mut hash = [0u8; DIGEST_LEN];
        cursor.read_exact(&mut hash)?;
        let stored = cursor.read_u64::<LittleEndian>()?;

        let entry = Self {
            sequence,
            hash: Digest(hash),
        };
        let found = entry.checksum();
        if found != stored {
            return Err(PersistenceError::ChecksumMismatch {
                sequence,
                expected: stored,
                found,
            });
        }
        Ok(entry)
    }
}

/// Appends leaf hashes, one durable write per entry.
pub struct HashLogWriter {
    path: PathBuf,
    file: BufWriter<File>,
    next_sequence: u64,
}

impl HashLogWriter {
    /// Open or create a hash log.
    ///
    /// An existing log is scanned in full so that new entries continue its
    /// sequence. A corrupted or truncated log is refused.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let has_content = path.exists() && std::fs::metadata(&path)?.len() > 0;

        let next_sequence = if has_content {
            let mut count = 0;
            for entry in HashLogReader::open(&path)? {
                entry?;
                count += 1;
            }
            count
        } else {
            0
        };

        let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
        if !has_content {
            file.write_all(&HashLogHeader::default().to_bytes())?;
            file.sync_all()?;
        }

        Ok(Self::from_parts(path, file, next_sequence))
    }

    pub(crate) fn from_parts(path: PathBuf, file: File, next_sequence: u64) -> Self {
        Self {
            path,
            file: BufWriter::new(file),
            next_sequence,
        }
    }

    /// Append one leaf hash. Returns its sequence number once the write is
    /// synced to disk.
    pub fn append(&mut self, hash: &Digest) -> Result<u64> {
        let entry = HashLogEntry {
            sequence: self.next_sequence,
            hash: *hash,
        };
        self.file.write_all(&entry.to_bytes()?)?;
        self.file.flush()?;
        self.file.get_ref().sync_data()?;

        self.next_sequence += 1;
        Ok(entry.sequence)
    }

    /// Number of entries in the log.
    pub fn len(&self) -> u64 {
        self.next_sequence
    }

    pub fn is_empty(&self) -> bool {
        self.next_sequence == 0
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Iterates the entries of a hash log in order.
pub struct HashLogReader {
    reader: BufReader<File>,
    expected: u64,
}

impl HashLogReader {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut reader = BufReader::new(File::open(path)?);
        HashLogHeader::read_from(&mut reader)?;
        Ok(Self { reader, expected: 0 })
    }

    /// Fill `buf` as far as the file allows. Returns the bytes read.
    fn read_full(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.reader.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(filled)
    }
}

impl Iterator for HashLogReader {
    type Item = Result<HashLogEntry>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = [0u8; HashLogEntry::SIZE];
        match self.read_full(&mut buf) {
            Ok(0) => return None,
            Ok(n) if n < HashLogEntry::SIZE => {
                return Some(Err(PersistenceError::Truncated { entries: self.expected }));
            }
            Ok(_) => {}
            Err(e) => return Some(Err(e.into())),
        }

        let entry = match HashLogEntry::decode(&buf) {
            Ok(entry) => entry,
            Err(e) => return Some(Err(e)),
        };
        if entry.sequence != self.expected {
            return Some(Err(PersistenceError::SequenceGap {
                expected: self.expected,
                found: entry.sequence,
            }));
        }
        self.expected += 1;
        Some(Ok(entry))
    }
}

/// Read every leaf hash of a log, in insertion order.
pub fn read_all(path: impl AsRef<Path>) -> Result<Vec<Digest>> {
    HashLogReader::open(path)?
        .map(|entry| entry.map(|e| e.hash))
        .collect()
}

/// Empty a log whose header was only partly written.
///
/// Returns `true` if the file was reset. The next [`HashLogWriter::open`]
/// writes a fresh header. A log with a complete header is left alone.
pub fn reset_torn_header(path: impl AsRef<Path>) -> Result<bool> {
    let path = path.as_ref();
    if !path.exists() {
        return Ok(false);
    }
    let len = std::fs::metadata(path)?.len();
    if len == 0 || len >= HashLogHeader::SIZE as u64 {
        return Ok(false);
    }
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(0)?;
    file.sync_all()?;
    Ok(true)
}

/// Cut a log back to its header plus the first `entries` entries.
///
/// Used to drop a partially written tail after a crash.
pub fn truncate_to(path: impl AsRef<Path>, entries: u64) -> Result<()> {
    let len = HashLogHeader::SIZE as u64 + entries * HashLogEntry::SIZE as u64;
    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(len)?;
    file.sync_all()?;
    Ok(())
}
