use serde::{Deserialize, Serialize};

use crate::config::TreeConfig;
use crate::hash::HashAlgorithm;
use crate::MerkleResult;

use super::proof::{verify_proof, Proof};
use super::traits::{LeafValue, MerkleHasher};
use super::tree::MerkleTree;
use super::types::{Digest, MerkleError};

/// Self-describing proof for an independent verifier.
///
/// Carries everything needed to replay the proof apart from the trusted root:
/// the hash primitive identity and the tree's combination rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofEnvelope {
    pub algorithm: HashAlgorithm,
    pub config: TreeConfig,
    pub proof: Proof,
}

impl ProofEnvelope {
    pub fn new(algorithm: HashAlgorithm, config: TreeConfig, proof: Proof) -> Self {
        Self {
            algorithm,
            config,
            proof,
        }
    }

    pub fn leaf_digest(&self) -> Option<&Digest> {
        self.proof.leaf_digest()
    }

    pub fn claimed_root(&self) -> Option<&Digest> {
        self.proof.claimed_root()
    }

    /// Verifies the enclosed proof against a trusted `root` with hasher `H`.
    ///
    /// `H` must be the primitive named by the envelope.
    pub fn verify<H: MerkleHasher>(&self, root: &Digest) -> MerkleResult<()> {
        if H::hash_algorithm() != self.algorithm {
            return Err(MerkleError::IncompatibleParams {
                reason: "hash algorithm mismatch",
            });
        }
        if self
            .proof
            .steps()
            .iter()
            .any(|step| step.digest.len() != H::digest_size())
        {
            return Err(MerkleError::IncompatibleParams {
                reason: "digest size mismatch",
            });
        }
        verify_proof::<H>(&self.config, root, &self.proof)
    }
}

impl<L: LeafValue, H: MerkleHasher> MerkleTree<L, H> {
    /// Same as [`Self::find_proof_for`], wrapped with the tree's parameters.
    pub fn export_proof<Q>(&self, leaf: &Q) -> MerkleResult<ProofEnvelope>
    where
        Q: LeafValue + ?Sized,
    {
        let proof = self.find_proof_for(leaf)?;
        Ok(ProofEnvelope::new(H::hash_algorithm(), *self.config(), proof))
    }
}
