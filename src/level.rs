// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Level store.
//!
//! Level 0 holds the leaves in insertion order. Level `k + 1` holds the
//! parents of adjacent pairs of level `k`, so its length is
//! `ceil(len(level k) / 2)`. The store only ever grows vertically.

use alloc::vec;
use core::ops::Index;
use alloc::vec::Vec;

use crate::node::{Node, NodeRef};

/// Result of placing a parent on its level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// The slot was touched for the first time.
    Appended,
    /// A self-paired placeholder in the last slot was replaced.
    Overwrote,
}

#[derive(Clone, Debug, Default)]
pub struct Level {
    nodes: Vec<Node>,
}

impl Index<usize> for Level {
    type Output = Node;

    fn index(&self, index: usize) -> &Node {
        &self.nodes[index]
    }
}

impl Level {
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.nodes.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter()
    }

    pub(crate) fn push(&mut self, node: Node) {
        debug_assert_eq!(node.level_index, self.nodes.len());
        self.nodes.push(node);
    }

    pub(crate) fn set_parent(&mut self, index: usize, parent: NodeRef) {
        if let Some(node) = self.nodes.get_mut(index) {
            node.parent = Some(parent);
        }
    }

    /// Append the node if its slot is new, otherwise overwrite the slot.
    ///
    /// Only the last slot of a level may be overwritten.
    pub(crate) fn place(&mut self, node: Node) -> Placement {
        let slot = node.level_index;
        let len = self.nodes.len();
        debug_assert!(slot <= len, "parent slot {} skips past level end {}", slot, len);

        if slot == len {
            self.nodes.push(node);
            Placement::Appended
        } else {
            debug_assert_eq!(slot + 1, len, "only the last slot of a level is mutable");
            self.nodes[slot] = node;
            Placement::Overwrote
        }
    }

    /// Position of the node paired with `index` on this level.
    ///
    /// Odd positions pair left, the last slot of an odd-length level pairs
    /// with itself, every other even position pairs right.
    pub fn sibling_index(&self, index: usize) -> usize {
        if index % 2 == 1 {
            index - 1
        } else if index + 1 == self.nodes.len() {
            index
        } else {
            index + 1
        }
    }

    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
    }
}

impl Index<usize> for LevelStore {
    type Output = Level;

    fn index(&self, index: usize) -> &Level {
        &self.levels[index]
    }
}

#[derive(Clone, Debug)]
pub struct LevelStore {
    levels: Vec<Level>,
}

impl Default for LevelStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelStore {
    pub fn new() -> Self {
        Self {
            levels: vec![Level::default()],
        }
    }

    /// Number of levels needed for `leaf_count` leaves: `ceil(log2(n)) + 1`.
    pub fn required_levels(leaf_count: usize) -> usize {
        if leaf_count <= 1 {
            return 1;
        }
        (usize::BITS - (leaf_count - 1).leading_zeros()) as usize + 1
    }

    /// Number of levels currently allocated, including empty ones.
    pub fn height(&self) -> usize {
        self.levels.len()
    }

    pub fn leaves(&self) -> &Level {
        &self.levels[0]
    }

    pub fn level(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub(crate) fn level_mut(&mut self, index: usize) -> &mut Level {
        &mut self.levels[index]
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Level> + ExactSizeIterator {
        self.levels.iter()
    }

    /// Append empty levels until `leaf_count` leaves fit. Never shrinks and
    /// never moves existing nodes.
    pub(crate) fn grow_to(&mut self, leaf_count: usize) -> bool {
        let needed = Self::required_levels(leaf_count);
        if self.levels.len() >= needed {
            return false;
        }
        self.levels.resize_with(needed, Level::default);
        true
    }

    pub(crate) fn get_node(&self, at: NodeRef) -> Option<&Node> {
        self.levels.get(at.level).and_then(|l| l.get(at.position))
    }
}
