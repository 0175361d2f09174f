use std::path::Path;

use crate::engine::ForensicTree;

/// Level dump of the tree stored in `log_path`, top level first.
pub fn render(log_path: &Path) -> anyhow::Result<String> {
    let forensic = ForensicTree::load(log_path)?;
    Ok(forensic.tree.to_string())
}

pub fn run(log_path: &Path) -> anyhow::Result<()> {
    print!("{}", render(log_path)?);
    Ok(())
}
