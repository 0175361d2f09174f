// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Append-only, checksummed log of leaf hashes.
//!
//! The log is the durable record of a tree: one entry per leaf, in insertion
//! order. On startup the node replays it into a fresh tree.

pub mod error;
pub mod hash_log;
pub mod fixtures;

pub use error::{PersistenceError, Result};
pub use hash_log::{reset_torn_header, truncate_to, read_all, HashLogEntry, HashLogHeader, HashLogReader, HashLogWriter};
