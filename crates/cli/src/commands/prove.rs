use anyhow::Context;
use merkle_kernel::Digest;
use serde::Serialize;
use std::path::Path;

use crate::engine::ForensicTree;

/// Everything a third party needs to check inclusion of one leaf.
#[derive(Serialize, Debug)]
pub struct ProofOutput {
    pub index: usize,
    pub leaf: Digest,
    pub root: Digest,
    pub hashes: Vec<Digest>,
}

pub fn build(log_path: &Path, index: usize) -> anyhow::Result<ProofOutput> {
    let forensic = ForensicTree::load(log_path)?;
    let hashes = forensic
        .tree
        .proof_for(index)
        .with_context(|| format!("No proof for leaf {index}"))?;

    Ok(ProofOutput {
        index,
        leaf: forensic.tree.hash_at(index)?,
        root: forensic.tree.root()?,
        hashes,
    })
}

pub fn run(log_path: &Path, index: usize) -> anyhow::Result<()> {
    let proof = build(log_path, index)?;
    println!("{}", serde_json::to_string_pretty(&proof)?);
    Ok(())
}
