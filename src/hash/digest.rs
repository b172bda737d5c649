use blake2::digest::consts::U32;
use blake2::Blake2b;
use sha2::{Digest as _, Sha256};

use super::HashAlgorithm;
use crate::merkle::{Digest, HashError, MerkleHasher};

type Blake2b256 = Blake2b<U32>;

fn digest_parts<D: sha2::Digest>(parts: &[&[u8]]) -> Digest {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    Digest::new(hasher.finalize().to_vec())
}

/// BLAKE2b-256 adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake2b256Hasher;

impl MerkleHasher for Blake2b256Hasher {
    fn hash_parts(parts: &[&[u8]]) -> Result<Digest, HashError> {
        Ok(digest_parts::<Blake2b256>(parts))
    }

    fn digest_size() -> usize {
        <Blake2b256 as sha2::Digest>::output_size()
    }

    fn hash_algorithm() -> HashAlgorithm {
        HashAlgorithm::Blake2b256
    }
}

/// SHA-256 adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl MerkleHasher for Sha256Hasher {
    fn hash_parts(parts: &[&[u8]]) -> Result<Digest, HashError> {
        Ok(digest_parts::<Sha256>(parts))
    }

    fn digest_size() -> usize {
        Sha256::output_size()
    }

    fn hash_algorithm() -> HashAlgorithm {
        HashAlgorithm::Sha256
    }
}
