use anyhow::Context;
use merkle_kernel::{hash_leaf, verify_path, Digest};

/// Check a record against a root using only the sibling path.
pub fn check(root: &str, index: usize, data: &str, hashes: &[String]) -> anyhow::Result<bool> {
    let root: Digest = root.parse().context("Invalid --root digest")?;
    let siblings = hashes
        .iter()
        .map(|h| h.parse::<Digest>().with_context(|| format!("Invalid --hash digest {h:?}")))
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(verify_path(&hash_leaf(data.as_bytes()), index, &siblings, &root))
}

pub fn run(root: &str, index: usize, data: &str, hashes: &[String]) -> anyhow::Result<()> {
    if check(root, index, data, hashes)? {
        println!("\n✅ VERIFIED\n");
        println!("Leaf {} is included under root {}\n", index, root);
        Ok(())
    } else {
        println!("\n❌ NOT VERIFIED\n");
        anyhow::bail!("Proof for leaf {} does not reconstruct root {}", index, root)
    }
}
