// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
use anyhow::{Context, Result};

use merkle_kernel::{Digest, MerkleTree};
use merkle_persistence::read_all;

use std::path::Path;

/// A tree rebuilt offline from a hash log.
pub struct ForensicTree {
    pub leaves: Vec<Digest>,
    pub tree: MerkleTree,
}

impl ForensicTree {
    pub fn load(log_path: &Path) -> Result<Self> {
        let leaves = read_all(log_path)
            .with_context(|| format!("Failed to read hash log {}", log_path.display()))?;
        let tree = MerkleTree::from_leaf_hashes(leaves.iter().copied());
        Ok(Self { leaves, tree })
    }

    pub fn len(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }
}
