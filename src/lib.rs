//! Core library entry point for `rpp-merkle`.
//!
//! The crate builds immutable binary Merkle trees over ordered, stringifiable
//! leaves and produces compact inclusion proofs that an independent party can
//! replay against a trusted root digest.
//!
//! ```
//! use rpp_merkle::{MerkleTree, Sha256Hasher, TreeConfig};
//!
//! let tree = MerkleTree::<&str, Sha256Hasher>::build(TreeConfig::hex(b':'), ["a", "b", "c"])?;
//! let proof = tree.find_proof_for("b")?;
//! tree.check_proof(&proof)?;
//! # Ok::<(), rpp_merkle::MerkleError>(())
//! ```

pub mod config;
pub mod hash;
pub mod merkle;

pub use config::{NodeEncoding, TreeConfig};
pub use hash::{Blake2b256Hasher, Blake3Hasher, HashAlgorithm, Sha256Hasher};
pub use merkle::{
    verify_proof, Digest, HashError, LeafValue, MerkleError, MerkleHasher, MerkleTree, Node,
    NodeId, NodeKind, Proof, ProofEnvelope, ProofStep, StepKind, MAX_LEAVES,
};

/// Result type used throughout the library.
pub type MerkleResult<T> = core::result::Result<T, MerkleError>;
