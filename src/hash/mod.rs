//! Hash primitives that can back a Merkle tree.
//!
//! The tree engine is agnostic to the primitive in use; it only talks to the
//! [`MerkleHasher`](crate::merkle::MerkleHasher) trait. This module provides
//! the identity enumeration carried inside exported proofs and adapters for
//! the primitives shipped with the crate:
//!
//! * [`Blake2b256Hasher`] – BLAKE2b with a 256-bit output.
//! * [`Sha256Hasher`] – SHA-256.
//! * [`Blake3Hasher`] – BLAKE3 with its default 256-bit output.

mod blake3;
mod digest;

pub use self::blake3::Blake3Hasher;
pub use self::digest::{Blake2b256Hasher, Sha256Hasher};

use serde::{Deserialize, Serialize};

/// Identity of the hash primitive that produced a tree.
///
/// | Variant | Digest Bits | Wire code |
/// |---------|-------------|-----------|
/// | `Blake2b256` | 256 | `1` |
/// | `Sha256` | 256 | `2` |
/// | `Blake3` | 256 | `3` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    Blake2b256,
    Sha256,
    Blake3,
}

impl HashAlgorithm {
    pub(crate) const fn code(self) -> u8 {
        match self {
            HashAlgorithm::Blake2b256 => 1,
            HashAlgorithm::Sha256 => 2,
            HashAlgorithm::Blake3 => 3,
        }
    }

    pub(crate) const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(HashAlgorithm::Blake2b256),
            2 => Some(HashAlgorithm::Sha256),
            3 => Some(HashAlgorithm::Blake3),
            _ => None,
        }
    }

    /// Output width of the primitive in bytes.
    pub const fn digest_size(self) -> usize {
        match self {
            HashAlgorithm::Blake2b256 | HashAlgorithm::Sha256 | HashAlgorithm::Blake3 => 32,
        }
    }
}
