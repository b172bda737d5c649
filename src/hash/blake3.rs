use super::HashAlgorithm;
use crate::merkle::{Digest, HashError, MerkleHasher};

/// BLAKE3 adapter using the default 32-byte output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    fn hash_parts(parts: &[&[u8]]) -> Result<Digest, HashError> {
        let mut hasher = blake3::Hasher::new();
        for part in parts {
            hasher.update(part);
        }
        Ok(Digest::new(hasher.finalize().as_bytes().to_vec()))
    }

    fn digest_size() -> usize {
        blake3::OUT_LEN
    }

    fn hash_algorithm() -> HashAlgorithm {
        HashAlgorithm::Blake3
    }
}
