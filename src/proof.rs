// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Sibling-hash proof extraction.

use alloc::vec::Vec;

use crate::error::KernelResult;
use crate::hash::Digest;
use crate::tree::MerkleTree;

impl MerkleTree {
    /// Sibling hashes needed to fold the leaf at `index` up to the root.
    ///
    /// Ordered bottom to top: the leaf's sibling first, then the sibling of
    /// its parent, stopping one level below the root. A root-only tree yields
    /// an empty path.
    pub fn proof_for(&self, index: usize) -> KernelResult<Vec<Digest>> {
        self.check_index(index)?;
        self.ensure_ready()?;

        let top = self.root_ref().map(|r| r.level).unwrap_or(0);
        let mut path = Vec::with_capacity(top);
        let mut position = index;

        for level in 0..top {
            let nodes = &self.levels()[level];
            let sibling = nodes.sibling_index(position);
            path.push(nodes[sibling].hash);
            position /= 2;
        }

        Ok(path)
    }
}
