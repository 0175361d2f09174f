// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Crash Recovery
//!
//! The hash log is the canonical record of a tree. Startup replays every
//! entry into a fresh tree, rebuilds the interior once, then reopens the log
//! for appending.
//!
//! A partially written final entry is the expected result of a crash during
//! `append` and is cut off. A partially written header means the crash came
//! before any entry, and the log starts over empty. Any other damage (bad
//! checksum, sequence gap, bad magic) aborts startup.

use merkle_kernel::MerkleTree;
use merkle_persistence::{reset_torn_header, truncate_to, HashLogReader, HashLogWriter, PersistenceError};

use crate::config::NodeConfig;
use crate::engine::Engine;
use crate::errors::EngineError;

use std::path::Path;
use std::time::Instant;

/// Replay a hash log into `tree`. Returns the number of leaves replayed.
///
/// The tree is left stale; call `rebuild` before reading from it.
pub fn replay_hash_log(tree: &mut MerkleTree, path: &Path) -> Result<u64, EngineError> {
    let mut replayed = 0u64;
    for entry in HashLogReader::open(path)? {
        match entry {
            Ok(entry) => {
                tree.replay_insert(entry.hash);
                replayed += 1;
            }
            Err(PersistenceError::Truncated { entries }) => {
                tracing::warn!(
                    "Hash log {:?} ends in a partial entry. Dropping tail after {} entries",
                    path,
                    entries
                );
                truncate_to(path, entries)?;
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }
    Ok(replayed)
}

/// Build the engine for `cfg`, restoring state from its hash log if present.
pub fn recover(cfg: &NodeConfig) -> Result<Engine, EngineError> {
    let Some(path) = &cfg.hash_log_path else {
        tracing::info!("No hash log configured. Tree is in-memory only");
        return Ok(Engine::in_memory());
    };

    if reset_torn_header(path)? {
        tracing::warn!("Hash log {:?} has a partial header. Starting it over", path);
    }

    let mut tree = MerkleTree::new();
    if has_hash_log(path) {
        let start = Instant::now();
        let replayed = replay_hash_log(&mut tree, path)?;
        tree.rebuild();

        let elapsed = start.elapsed();
        metrics::histogram!("merkle_replay_duration_seconds", elapsed.as_secs_f64());
        tracing::info!(
            "Recovered {} leaves from {:?} in {:?}",
            replayed,
            path,
            elapsed
        );
    } else {
        tracing::info!("No hash log at {:?}. Starting with an empty tree", path);
    }

    let writer = HashLogWriter::open(path)?;
    if writer.len() != tree.len() as u64 {
        tracing::error!(
            "Hash log holds {} entries but {} leaves were replayed",
            writer.len(),
            tree.len()
        );
        return Err(EngineError::Internal);
    }

    Ok(Engine::new(tree, Some(writer)))
}

/// Check that a log file exists and holds more than an empty header.
pub fn has_hash_log(path: &Path) -> bool {
    path.exists()
        && std::fs::metadata(path)
            .map(|m| m.len() > 0)
            .unwrap_or(false)
}
