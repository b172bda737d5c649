use std::borrow::Cow;
use std::fmt;

use crate::hash::HashAlgorithm;

use super::types::{Digest, HashError};

/// Hash abstraction used by the Merkle layer.
///
/// Implementations are pure functions over their input: every call starts
/// from a fresh primitive state, so a tree can be shared across threads
/// without any hasher state to race on.
pub trait MerkleHasher {
    /// Hashes the concatenation of `parts`.
    fn hash_parts(parts: &[&[u8]]) -> Result<Digest, HashError>;

    fn hash(bytes: &[u8]) -> Result<Digest, HashError> {
        Self::hash_parts(&[bytes])
    }

    fn digest_size() -> usize;

    fn hash_algorithm() -> HashAlgorithm;
}

/// Capability required from leaf values.
///
/// The canonical string is both the hashing input of the leaf and the lookup
/// key used when a proof is requested. Any `Display` type qualifies through
/// the blanket impl, which has to format into an owned string; types without
/// `Display` can implement the trait by hand and borrow their own buffer.
pub trait LeafValue {
    fn canonical_string(&self) -> Cow<'_, str>;
}

impl<T: fmt::Display + ?Sized> LeafValue for T {
    fn canonical_string(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }
}
