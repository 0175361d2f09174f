use merkle_kernel::{verify_path, MerkleTree};
use merkle_node::config::NodeConfig;
use merkle_node::recovery::recover;
use merkle_node::server::shared;
use merkle_persistence::read_all;
use tempfile::tempdir;

fn config_for(path: &std::path::Path) -> NodeConfig {
    NodeConfig {
        hash_log_path: Some(path.to_path_buf()),
        ..NodeConfig::default()
    }
}

#[test]
fn test_restart_restores_root_and_proofs() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hashes.log");
    let records: Vec<String> = (0..37).map(|i| format!("record-{i}")).collect();

    let (root_before, proof_before) = {
        let mut engine = recover(&config_for(&path)).unwrap();
        for r in &records {
            engine.add(r.as_bytes());
        }
        (engine.tree().root().unwrap(), engine.proof_for(20).unwrap())
    };

    let engine = recover(&config_for(&path)).unwrap();
    assert_eq!(engine.len(), records.len());
    assert_eq!(engine.tree().root().unwrap(), root_before);
    assert_eq!(engine.proof_for(20).unwrap(), proof_before);
    assert!(engine.verify(records[20].as_bytes(), 20, &proof_before).unwrap());
}

#[test]
fn test_appends_after_restart_extend_the_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hashes.log");

    {
        let mut engine = recover(&config_for(&path)).unwrap();
        engine.add(b"a");
        engine.add(b"b");
        engine.add(b"c");
    }
    {
        let mut engine = recover(&config_for(&path)).unwrap();
        let (index, _) = engine.add(b"d");
        assert_eq!(index, 3);
    }

    let mut expected = MerkleTree::new();
    for r in [b"a", b"b", b"c", b"d"] {
        expected.add(r);
    }

    let hashes = read_all(&path).unwrap();
    assert_eq!(hashes.len(), 4);
    let rebuilt = MerkleTree::from_leaf_hashes(hashes);
    assert_eq!(rebuilt.root().unwrap(), expected.root().unwrap());
}

#[test]
fn test_proof_from_restarted_node_verifies_standalone() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("hashes.log");

    {
        let mut engine = recover(&config_for(&path)).unwrap();
        for i in 0..9u8 {
            engine.add(&[i]);
        }
    }

    let engine = recover(&config_for(&path)).unwrap();
    let root = engine.tree().root().unwrap();
    for index in 0..9usize {
        let proof = engine.proof_for(index).unwrap();
        let leaf = engine.hash_at(index).unwrap();
        assert!(verify_path(&leaf, index, &proof, &root));
    }
}

#[tokio::test]
async fn test_concurrent_inserts_and_reads() {
    let state = shared(recover(&NodeConfig::default()).unwrap());

    let mut handles = Vec::new();
    for worker in 0..8 {
        let state = state.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..25 {
                let data = format!("w{worker}-{i}");
                let (index, _) = state.write().await.add(data.as_bytes());

                let engine = state.read().await;
                let proof = engine.proof_for(index).unwrap();
                assert!(engine.verify(data.as_bytes(), index, &proof).unwrap());
            }
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let engine = state.read().await;
    assert_eq!(engine.len(), 200);

    // every index handed out exactly once
    let mut leaves: Vec<_> = (0..200).map(|i| engine.hash_at(i).unwrap()).collect();
    leaves.sort();
    leaves.dedup();
    assert_eq!(leaves.len(), 200);

    let rebuilt = MerkleTree::from_leaf_hashes((0..200).map(|i| engine.hash_at(i).unwrap()));
    assert_eq!(rebuilt.root().unwrap(), engine.tree().root().unwrap());
}
