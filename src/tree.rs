// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Incremental Merkle tree.
//!
//! `add` appends a leaf and recomputes only its ancestor chain, one node per
//! level. When a level has odd length its last node is paired with itself;
//! that provisional parent is overwritten in place once the real sibling
//! arrives.
//!
//! `replay_insert` + `rebuild` restore a tree from previously recorded leaf
//! hashes with a single level-by-level reduction instead of `n` incremental
//! propagations.

use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{KernelError, KernelResult};
use crate::hash::{hash_leaf, hash_pair, Digest};
use crate::level::{LevelStore, Placement};
use crate::node::{Node, NodeRef};

/// The only externally serialized form of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeSummary {
    pub root: Digest,
    pub length: usize,
}

#[derive(Clone, Debug, Default)]
pub struct MerkleTree {
    levels: LevelStore,
    root: Option<NodeRef>,
    // Set by replay_insert: leaves are current, interior levels are not.
    stale: bool,
}

impl MerkleTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from already-computed leaf hashes, in insertion order.
    pub fn from_leaf_hashes<I>(hashes: I) -> Self
    where
        I: IntoIterator<Item = Digest>,
    {
        let mut tree = Self::new();
        for hash in hashes {
            tree.replay_insert(hash);
        }
        tree.rebuild();
        tree
    }

    /// Hash `record` and append it as the next leaf.
    ///
    /// Returns the leaf's 0-based index and its hash. Never fails.
    pub fn add(&mut self, record: &[u8]) -> (usize, Digest) {
        self.append_leaf(hash_leaf(record))
    }

    fn append_leaf(&mut self, hash: Digest) -> (usize, Digest) {
        if self.stale {
            self.rebuild();
        }

        let index = self.levels.leaves().len();
        self.levels.level_mut(0).push(Node::leaf(index, hash));

        if index == 0 {
            self.root = Some(NodeRef::new(0, 0));
            return (index, hash);
        }

        self.levels.grow_to(index + 1);
        self.root = Some(self.propagate());
        (index, hash)
    }

    /// Recompute the chain of parents above the last leaf. Returns the root.
    fn propagate(&mut self) -> NodeRef {
        let top = self.levels.height() - 1;
        let mut current = NodeRef::new(0, self.levels.leaves().len() - 1);

        for level in 0..top {
            let (left_pos, right_pos, parent) = {
                let nodes = &self.levels[level];
                let length = nodes.len();
                let right_pos = length - 1;
                // Even length: the new node completed a pair.
                // Odd length: it is alone and pairs with itself.
                let left_pos = if length % 2 == 0 { length - 2 } else { right_pos };

                let left = &nodes[left_pos];
                let right = &nodes[right_pos];
                let parent = Node::interior(
                    right.level_index / 2,
                    hash_pair(&left.hash, &right.hash),
                    left_pos == right_pos,
                );
                (left_pos, right_pos, parent)
            };

            let parent_ref = NodeRef::new(level + 1, parent.level_index);
            let children = self.levels.level_mut(level);
            children.set_parent(left_pos, parent_ref);
            children.set_parent(right_pos, parent_ref);

            // A fresh slot on the next level can only hold a self-paired parent.
            let placement = self.levels.level_mut(level + 1).place(parent);
            debug_assert!(
                placement == Placement::Overwrote || left_pos == right_pos,
                "appended parent at level {} must be provisional",
                level + 1
            );
            current = parent_ref;
        }

        debug_assert_eq!(self.levels[top].len(), 1, "top level must hold exactly the root");
        current
    }

    /// Insert an already-computed leaf hash without re-hashing and without
    /// propagation. Call [`MerkleTree::rebuild`] once all hashes are loaded.
    pub fn replay_insert(&mut self, hash: Digest) -> usize {
        let index = self.levels.leaves().len();
        self.levels.level_mut(0).push(Node::leaf(index, hash));
        self.stale = true;
        index
    }

    /// Recompute every interior level from the leaves by pairwise reduction.
    pub fn rebuild(&mut self) {
        let leaf_count = self.levels.leaves().len();
        self.levels.grow_to(leaf_count);
        let height = self.levels.height();

        for level in 1..height {
            self.levels.level_mut(level).clear();
        }
        self.stale = false;

        if leaf_count == 0 {
            self.root = None;
            return;
        }

        let top = height - 1;
        for level in 0..top {
            let len = self.levels[level].len();
            let mut parents = Vec::with_capacity((len + 1) / 2);
            {
                let nodes = &self.levels[level];
                for left_pos in (0..len).step_by(2) {
                    let right_pos = if left_pos + 1 < len { left_pos + 1 } else { left_pos };
                    parents.push(Node::interior(
                        left_pos / 2,
                        hash_pair(&nodes[left_pos].hash, &nodes[right_pos].hash),
                        left_pos == right_pos,
                    ));
                }
            }

            let children = self.levels.level_mut(level);
            for pos in 0..len {
                children.set_parent(pos, NodeRef::new(level + 1, pos / 2));
            }
            let next = self.levels.level_mut(level + 1);
            for parent in parents {
                next.push(parent);
            }
        }

        debug_assert_eq!(self.levels[top].len(), 1);
        self.root = Some(NodeRef::new(top, 0));
    }

    pub(crate) fn ensure_ready(&self) -> KernelResult<()> {
        if self.stale {
            return Err(KernelError::PendingRebuild);
        }
        Ok(())
    }

    pub(crate) fn check_index(&self, index: usize) -> KernelResult<()> {
        let len = self.len();
        if index >= len {
            return Err(KernelError::OutOfRange { index, len });
        }
        Ok(())
    }

    pub(crate) fn root_ref(&self) -> Option<NodeRef> {
        self.root
    }

    /// Hash of the root node. Fails with `Empty` when no leaf was added.
    pub fn root(&self) -> KernelResult<Digest> {
        self.ensure_ready()?;
        self.root
            .and_then(|at| self.levels.get_node(at))
            .map(|node| node.hash)
            .ok_or(KernelError::Empty)
    }

    /// Number of leaves.
    pub fn len(&self) -> usize {
        self.levels.leaves().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Hash of the leaf at `index`.
    pub fn hash_at(&self, index: usize) -> KernelResult<Digest> {
        self.check_index(index)?;
        Ok(self.levels.leaves()[index].hash)
    }

    pub fn levels(&self) -> &LevelStore {
        &self.levels
    }

    pub fn node(&self, at: NodeRef) -> Option<&Node> {
        self.levels.get_node(at)
    }

    pub fn summary(&self) -> KernelResult<TreeSummary> {
        Ok(TreeSummary {
            root: self.root()?,
            length: self.len(),
        })
    }
}

/// Diagnostic dump, top level first.
impl fmt::Display for MerkleTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, level) in self.levels.iter().enumerate().rev() {
            writeln!(f, "Level: {}, Count: {}", i, level.len())?;
            for node in level.iter() {
                write!(f, "{}\t", node.hash)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
