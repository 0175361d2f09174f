use merkle_cli::commands::{dump, inspect, prove, verify};
use merkle_kernel::{hash_leaf, MerkleTree};
use merkle_persistence::fixtures;
use tempfile::tempdir;

#[test]
fn test_integration_workflow() {
    let dir = tempdir().unwrap();
    let log = fixtures::generate_test_scenario(dir.path()).unwrap();

    assert!(inspect::run(&log).is_ok());
    assert!(dump::run(&log).is_ok());
    assert!(prove::run(&log, 4).is_ok());
}

#[test]
fn test_prove_then_verify_offline() {
    let dir = tempdir().unwrap();
    let log = fixtures::generate_test_scenario(dir.path()).unwrap();

    let proof = prove::build(&log, 2).unwrap();
    assert_eq!(proof.leaf, hash_leaf(b"c"));
    assert_eq!(proof.hashes.len(), 3);

    let root = proof.root.to_string();
    let hashes: Vec<String> = proof.hashes.iter().map(|h| h.to_string()).collect();

    assert!(verify::check(&root, 2, "c", &hashes).unwrap());
    assert!(verify::run(&root, 2, "c", &hashes).is_ok());

    // wrong record, wrong index
    assert!(!verify::check(&root, 2, "x", &hashes).unwrap());
    assert!(!verify::check(&root, 3, "c", &hashes).unwrap());
    assert!(verify::run(&root, 2, "x", &hashes).is_err());
}

#[test]
fn test_verify_rejects_bad_hex() {
    let bad = verify::check("0x1234", 0, "a", &[]);
    assert!(bad.is_err());

    let root = hash_leaf(b"a").to_string();
    assert!(verify::check(&root, 0, "a", &["nothex".to_string()]).is_err());
    // single leaf: empty path, leaf is the root
    assert!(verify::check(&root, 0, "a", &[]).unwrap());
}

#[test]
fn test_dump_matches_live_tree() {
    let dir = tempdir().unwrap();
    let log = fixtures::generate_test_scenario(dir.path()).unwrap();

    let mut live = MerkleTree::new();
    for r in [b"a", b"b", b"c", b"d", b"e"] {
        live.add(r);
    }
    assert_eq!(dump::render(&log).unwrap(), live.to_string());
}

#[test]
fn test_prove_out_of_range() {
    let dir = tempdir().unwrap();
    let log = fixtures::generate_test_scenario(dir.path()).unwrap();
    assert!(prove::build(&log, 5).is_err());
}

#[test]
fn test_inspect_reports_corruption() {
    let dir = tempdir().unwrap();
    let log = fixtures::generate_test_scenario(dir.path()).unwrap();

    let mut bytes = std::fs::read(&log).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xff;
    std::fs::write(&log, &bytes).unwrap();

    assert!(inspect::run(&log).is_err());
    assert!(inspect::run(&dir.path().join("missing.log")).is_err());
}
