use rpp_merkle::{
    Blake2b256Hasher, Blake3Hasher, Digest, HashAlgorithm, HashError, MerkleError, MerkleHasher,
    MerkleTree, Proof, ProofStep, Sha256Hasher, StepKind, TreeConfig,
};

const LETTERS: [&str; 7] = ["A", "B", "C", "D", "E", "F", "G"];

fn hex_to_digest(hex: &str) -> Digest {
    Digest::from_hex(hex).expect("valid hex digest")
}

#[test]
fn blake2b_raw_reference_tree() {
    let tree = MerkleTree::<&str, Blake2b256Hasher>::build(TreeConfig::raw(0x31), LETTERS)
        .expect("tree");
    assert_eq!(
        tree.root_digest().to_hex(),
        "5483ad15710ff90055105b6915221db1887242f0d71f0b0e5744ddd7b672cc34"
    );

    let mut proof = tree.find_proof_for("D").expect("proof");
    assert_eq!(proof.len(), 5);
    let expected = [
        (
            StepKind::Leaf,
            "040a19599567efff5f475fed100bd64c61d75d78bc7909b34e87a1d3a7e812ed",
        ),
        (
            StepKind::Left,
            "3d0b4444caf592641656e5e5e765f6f5791ddd2c25fe6bcd38b4b3a15b80e0d8",
        ),
        (
            StepKind::Left,
            "5990949a3c84a3ac41c9627e1cd2cebb50ee6125bbeb01e583c102a3aca7bf5d",
        ),
        (
            StepKind::Right,
            "f3e7e4384b32d356824cf22d1658a855479c324bcd38841c79481fbf742e06fd",
        ),
        (
            StepKind::Root,
            "5483ad15710ff90055105b6915221db1887242f0d71f0b0e5744ddd7b672cc34",
        ),
    ];
    for (step, (kind, digest)) in proof.steps().iter().zip(expected) {
        assert_eq!(step.kind, kind);
        assert_eq!(step.digest, hex_to_digest(digest));
    }
    tree.check_proof(&proof).expect("valid proof");

    proof.steps_mut()[1].digest.as_bytes_mut()[2] += 1;
    assert_eq!(
        tree.check_proof(&proof).unwrap_err(),
        MerkleError::ProofMismatch
    );
}

#[test]
fn blake2b_empty_tree_root() {
    let tree = MerkleTree::<&str, Blake2b256Hasher>::build(TreeConfig::raw(0x31), [])
        .expect("tree");
    assert_eq!(
        tree.root_digest().to_hex(),
        "0e5751c026e543b2e8ab2eb06099daa1d1e5df47778f7787faab45cdf12fe3a8"
    );
    assert_eq!(tree.leaf_count(), 0);
    assert_eq!(tree.node_count(), 1);
}

#[test]
fn sha256_hex_colon_reference_tree() {
    let tree =
        MerkleTree::<&str, Sha256Hasher>::build(TreeConfig::hex(b':'), LETTERS).expect("tree");
    assert_eq!(
        tree.root_digest().to_hex(),
        "33dc5cfadad32f7315dfe0d6bf74329dbb85b458a81c3e645e8d1c4bf12b1fb4"
    );
    let mut proof = tree.find_proof_for("D").expect("proof");
    assert_eq!(proof.len(), 5);
    tree.check_proof(&proof).expect("valid proof");

    proof.steps_mut()[1].digest.as_bytes_mut()[2] += 1;
    assert!(matches!(
        tree.check_proof(&proof),
        Err(MerkleError::ProofMismatch) | Err(MerkleError::RootMismatch)
    ));
}

#[test]
fn singleton_root_is_the_leaf_hash() {
    let tree = MerkleTree::<&str, Blake2b256Hasher>::build(TreeConfig::raw(0x31), ["A"])
        .expect("tree");
    assert_eq!(
        tree.root_digest().to_hex(),
        "a3a0081351bb785d0758ddf68076a95ffd3f10b88bbc9911e9fea4d793c06414"
    );
}

#[test]
fn three_leaves_split_left_biased() {
    let tree = MerkleTree::<&str, Blake2b256Hasher>::build(TreeConfig::raw(0x31), ["A", "B", "C"])
        .expect("tree");
    assert_eq!(
        tree.root_digest().to_hex(),
        "a3c9ead74af5ad02364f62063a8ebe8d9dc8bfd87698795a04650f7533b3fd95"
    );
}

#[test]
fn rendered_tree_matches_reference() {
    let tree = MerkleTree::<&str, Blake2b256Hasher>::build(TreeConfig::raw(0x31), LETTERS)
        .expect("tree");
    insta::assert_snapshot!(tree.to_string(), @r"
    - 5483ad15710ff90055105b6915221db1887242f0d71f0b0e5744ddd7b672cc34:
      - a77f3e56559696499277130e37df270ac68c378945d6675662eb7d6dc031b47c:
        - 5990949a3c84a3ac41c9627e1cd2cebb50ee6125bbeb01e583c102a3aca7bf5d:
          - a3a0081351bb785d0758ddf68076a95ffd3f10b88bbc9911e9fea4d793c06414 (A)
          - 12488d41ba695611d8a8c863f7bece34908adaa44f9be47fa40203939e4c123a (B)
        - d68cf3b262e99de048804fcafe0c06408c54a4dd36ac06cf16e4a3a54346d458:
          - 3d0b4444caf592641656e5e5e765f6f5791ddd2c25fe6bcd38b4b3a15b80e0d8 (C)
          - 040a19599567efff5f475fed100bd64c61d75d78bc7909b34e87a1d3a7e812ed (D)
      - f3e7e4384b32d356824cf22d1658a855479c324bcd38841c79481fbf742e06fd:
        - 5929da3c7c08508e9d580d0d39c7f0557df32eafb093573f315f70a9152cf345:
          - 769c4c7174d14a04212467e9a01b481303bf520634482586fdab7fdafa94c453 (E)
          - e4fa7873bef573a05208bc5ab48e0092480ebba2557e97e863bd00ff96125ef5 (F)
        - 613db96b4bb02fdc3cdf210f550022ea71fb797685504687c9f264ae23a23607 (G)
    ");
}

#[test]
fn proof_length_ignores_encoding_and_hash() {
    let raw = MerkleTree::<&str, Blake3Hasher>::build(TreeConfig::raw(0), LETTERS).expect("tree");
    let hex = MerkleTree::<&str, Sha256Hasher>::build(TreeConfig::hex(b':'), LETTERS)
        .expect("tree");
    for leaf in LETTERS {
        assert_eq!(
            raw.find_proof_for(leaf).expect("proof").len(),
            hex.find_proof_for(leaf).expect("proof").len()
        );
    }
    assert_eq!(raw.find_proof_for("G").expect("proof").len(), 4);
}

/// Delegates to SHA-256 but refuses inputs longer than a single leaf.
struct ShortInputHasher;

impl MerkleHasher for ShortInputHasher {
    fn hash_parts(parts: &[&[u8]]) -> Result<Digest, HashError> {
        let len: usize = parts.iter().map(|part| part.len()).sum();
        if len > 8 {
            return Err(HashError::new("input too long"));
        }
        Sha256Hasher::hash_parts(parts)
    }

    fn digest_size() -> usize {
        Sha256Hasher::digest_size()
    }

    fn hash_algorithm() -> HashAlgorithm {
        HashAlgorithm::Sha256
    }
}

#[test]
fn hash_failure_aborts_construction() {
    assert!(MerkleTree::<&str, ShortInputHasher>::build_default(["A"]).is_ok());
    let err = MerkleTree::<&str, ShortInputHasher>::build_default(["A", "B"]).unwrap_err();
    assert_eq!(
        err,
        MerkleError::HashWriteFailure(HashError::new("input too long"))
    );
}

#[test]
fn hash_failure_aborts_verification() {
    let tree = MerkleTree::<&str, Sha256Hasher>::build_default(["A", "B"]).expect("tree");
    let proof = tree.find_proof_for("A").expect("proof");
    let err =
        rpp_merkle::verify_proof::<ShortInputHasher>(tree.config(), tree.root_digest(), &proof)
            .unwrap_err();
    assert!(matches!(err, MerkleError::HashWriteFailure(_)));
}

/// Refuses every input.
struct RejectingHasher;

impl MerkleHasher for RejectingHasher {
    fn hash_parts(_parts: &[&[u8]]) -> Result<Digest, HashError> {
        Err(HashError::new("hashing disabled"))
    }

    fn digest_size() -> usize {
        32
    }

    fn hash_algorithm() -> HashAlgorithm {
        HashAlgorithm::Sha256
    }
}

#[test]
fn shape_checks_run_before_any_hashing() {
    let tree = MerkleTree::<&str, Sha256Hasher>::build_default(LETTERS).expect("tree");
    let proof = tree.find_proof_for("C").expect("proof");
    let root = tree.root_digest();

    let mut no_leaf = proof.clone();
    no_leaf.steps_mut()[0].kind = StepKind::Left;
    let mut no_root = proof.clone();
    let last = no_root.len() - 1;
    no_root.steps_mut()[last].kind = StepKind::Right;
    let single = Proof::new(vec![ProofStep::leaf(root.clone())]);
    let mut interior_root = proof.clone();
    interior_root.steps_mut()[1].kind = StepKind::Root;
    let mut interior_leaf = proof;
    interior_leaf.steps_mut()[2].kind = StepKind::Leaf;

    for bad in [no_leaf, no_root, single, Proof::new(Vec::new()), interior_root, interior_leaf] {
        let err = rpp_merkle::verify_proof::<RejectingHasher>(tree.config(), root, &bad)
            .unwrap_err();
        assert!(
            matches!(err, MerkleError::MalformedProof { .. }),
            "expected a shape error, got {err:?}"
        );
    }

    let well_formed = tree.find_proof_for("C").expect("proof");
    assert_eq!(
        rpp_merkle::verify_proof::<RejectingHasher>(tree.config(), root, &well_formed)
            .unwrap_err(),
        MerkleError::HashWriteFailure(HashError::new("hashing disabled"))
    );
}
