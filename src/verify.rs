// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Proof verification.

use crate::error::KernelResult;
use crate::hash::{hash_leaf, hash_pair, Digest};
use crate::tree::MerkleTree;

/// Fold a leaf hash up through a sibling path.
///
/// At each step an even position means the accumulator is the left child,
/// an odd position means it is the right child.
pub fn fold_path(leaf_hash: Digest, index: usize, siblings: &[Digest]) -> Digest {
    let mut acc = leaf_hash;
    let mut position = index;
    for sibling in siblings {
        acc = if position % 2 == 0 {
            hash_pair(&acc, sibling)
        } else {
            hash_pair(sibling, &acc)
        };
        position /= 2;
    }
    acc
}

/// Standalone check of a sibling path against a separately obtained root.
///
/// Touches no tree storage, so it is usable by a third party that only
/// knows the root.
pub fn verify_path(leaf_hash: &Digest, index: usize, siblings: &[Digest], root: &Digest) -> bool {
    fold_path(*leaf_hash, index, siblings) == *root
}

impl MerkleTree {
    /// Check that `record` is the leaf at `index` and that `siblings` folds
    /// it up to this tree's root.
    ///
    /// The record is first compared against the stored leaf, so this is a
    /// local sanity check that trusts the tree's own state. Use
    /// [`verify_path`] for independent verification.
    pub fn verify(&self, record: &[u8], index: usize, siblings: &[Digest]) -> KernelResult<bool> {
        self.check_index(index)?;
        self.ensure_ready()?;

        let leaf_hash = hash_leaf(record);
        if leaf_hash != self.hash_at(index)? {
            return Ok(false);
        }

        let root = self.root()?;
        Ok(verify_path(&leaf_hash, index, siblings, &root))
    }
}
