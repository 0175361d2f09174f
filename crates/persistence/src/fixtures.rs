use crate::error::Result;
use crate::hash_log::HashLogWriter;

use merkle_kernel::{hash_leaf, Digest};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

/// Write a hash log holding the leaf hashes of `records`, in order.
pub fn write_log(path: &Path, records: &[&[u8]]) -> Result<Vec<Digest>> {
    let mut writer = HashLogWriter::open(path)?;
    let mut hashes = Vec::with_capacity(records.len());
    for record in records {
        let hash = hash_leaf(record);
        writer.append(&hash)?;
        hashes.push(hash);
    }
    Ok(hashes)
}

/// Create `dir/hashes.log` with the leaves `"a"`, `"b"`, `"c"`, `"d"`, `"e"`.
pub fn generate_test_scenario(dir: &Path) -> Result<PathBuf> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join("hashes.log");
    write_log(&path, &[b"a", b"b", b"c", b"d", b"e"])?;
    Ok(path)
}

/// A writer for a valid log at `path` whose file handle is read-only, so
/// every `append` fails.
pub fn read_only_writer(path: &Path) -> Result<HashLogWriter> {
    let next_sequence = HashLogWriter::open(path)?.len();
    let file = File::open(path)?;
    Ok(HashLogWriter::from_parts(path.to_path_buf(), file, next_sequence))
}
