// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use merkle_kernel::{Digest, MerkleTree, TreeSummary};
use merkle_persistence::HashLogWriter;

use crate::errors::EngineError;

use std::path::Path;

/// The tree plus its durable hash log.
///
/// Persistence is best effort: a failed log write is logged and counted but
/// never undoes the in-memory append. After the first failure the log is
/// detached so that it stays a gap-free prefix of the tree.
pub struct Engine {
    tree: MerkleTree,
    hash_log: Option<HashLogWriter>,
    persist_failures: u64,
}

impl Engine {
    pub fn new(tree: MerkleTree, hash_log: Option<HashLogWriter>) -> Self {
        metrics::gauge!("merkle_tree_length", tree.len() as f64);
        Self {
            tree,
            hash_log,
            persist_failures: 0,
        }
    }

    /// Empty tree, no persistence.
    pub fn in_memory() -> Self {
        Self::new(MerkleTree::new(), None)
    }

    /// Append a record. Never fails; persistence errors are swallowed.
    pub fn add(&mut self, data: &[u8]) -> (usize, Digest) {
        let (index, hash) = self.tree.add(data);
        self.persist(index, &hash);

        metrics::counter!("merkle_leaves_appended_total", 1);
        metrics::gauge!("merkle_tree_length", self.tree.len() as f64);
        tracing::debug!(index, %hash, "leaf appended");

        (index, hash)
    }

    fn persist(&mut self, index: usize, hash: &Digest) {
        let Some(writer) = self.hash_log.as_mut() else {
            return;
        };
        if let Err(e) = writer.append(hash) {
            self.persist_failures += 1;
            metrics::counter!("merkle_persist_failures_total", 1);
            tracing::error!(
                "Failed to persist leaf {} ({}): {}. Hash log detached at {:?}",
                index,
                hash,
                e,
                writer.path()
            );
            self.hash_log = None;
        }
    }

    pub fn proof_for(&self, index: usize) -> Result<Vec<Digest>, EngineError> {
        let hashes = self.tree.proof_for(index)?;
        metrics::counter!("merkle_proofs_generated_total", 1);
        Ok(hashes)
    }

    pub fn verify(&self, data: &[u8], index: usize, hashes: &[Digest]) -> Result<bool, EngineError> {
        let exists = self.tree.verify(data, index, hashes)?;
        metrics::counter!("merkle_validations_total", 1);
        Ok(exists)
    }

    pub fn hash_at(&self, index: usize) -> Result<Digest, EngineError> {
        Ok(self.tree.hash_at(index)?)
    }

    /// Root and length, or `None` while the tree is empty.
    pub fn status(&self) -> Result<Option<TreeSummary>, EngineError> {
        if self.tree.is_empty() {
            return Ok(None);
        }
        Ok(Some(self.tree.summary()?))
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn dump(&self) -> String {
        self.tree.to_string()
    }

    pub fn tree(&self) -> &MerkleTree {
        &self.tree
    }

    pub fn persist_failures(&self) -> u64 {
        self.persist_failures
    }

    pub fn hash_log_path(&self) -> Option<&Path> {
        self.hash_log.as_ref().map(|w| w.path())
    }
}
