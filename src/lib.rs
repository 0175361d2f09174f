// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
#![no_std]

//! merkle-kernel: an incremental, append-only Merkle accumulator.
//!
//! Leaves are appended one at a time and only the ancestor chain of the new
//! leaf is recomputed. The tree can extract sibling-hash proofs for any leaf
//! and verify them against its root.

extern crate alloc;

#[cfg(any(test, feature = "std"))]
#[macro_use]
extern crate std;

pub mod error;
pub mod hash;
pub mod node;
pub mod level;
pub mod tree;
pub mod proof;
pub mod verify;

pub use error::{KernelError, KernelResult};
pub use hash::{hash_leaf, hash_pair, Digest, DIGEST_LEN};
pub use tree::{MerkleTree, TreeSummary};
pub use verify::{fold_path, verify_path};
