// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Tree Node definition.

use crate::hash::Digest;

/// Address of a node inside the level store.
///
/// Used for parent back-references and for the root. Resolved by lookup,
/// never owning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeRef {
    pub level: usize,
    pub position: usize,
}

impl NodeRef {
    pub const fn new(level: usize, position: usize) -> Self {
        Self { level, position }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeState {
    /// Leaf, or interior node built from two distinct children.
    Final,
    /// Interior node built by pairing the last node of an odd-length level
    /// with itself. Overwritten once the real sibling arrives.
    Provisional,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Node {
    pub hash: Digest,
    pub level_index: usize,
    pub parent: Option<NodeRef>,
    pub state: NodeState,
}

impl Node {
    pub fn leaf(level_index: usize, hash: Digest) -> Self {
        Self {
            hash,
            level_index,
            parent: None,
            state: NodeState::Final,
        }
    }

    pub fn interior(level_index: usize, hash: Digest, self_paired: bool) -> Self {
        let state = if self_paired {
            NodeState::Provisional
        } else {
            NodeState::Final
        };
        Self {
            hash,
            level_index,
            parent: None,
            state,
        }
    }

    pub fn is_provisional(&self) -> bool {
        self.state == NodeState::Provisional
    }
}
