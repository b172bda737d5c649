use serde::{Deserialize, Serialize};
use std::fmt;

/// Digest produced by a [`MerkleHasher`](super::MerkleHasher).
///
/// The width is fixed by the hash primitive, not by this type. Serialised
/// through serde the digest is a lowercase hexadecimal string.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Digest {
    #[serde(with = "hex::serde")]
    bytes: Vec<u8>,
}

impl Digest {
    /// Creates a digest from raw bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    /// Parses a digest from a hexadecimal string.
    pub fn from_hex(hex: &str) -> Result<Self, hex::FromHexError> {
        hex::decode(hex).map(Self::new)
    }

    /// Returns a reference to the underlying bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the digest and returns the bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Mutable view into the digest bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Lowercase hexadecimal rendering.
    pub fn to_hex(&self) -> String {
        hex::encode(&self.bytes)
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest(0x")?;
        for byte in &self.bytes {
            write!(f, "{:02x}", byte)?;
        }
        write!(f, ")")
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl From<Vec<u8>> for Digest {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl<const N: usize> From<[u8; N]> for Digest {
    fn from(bytes: [u8; N]) -> Self {
        Self::new(bytes.to_vec())
    }
}

/// Index of a node inside the tree arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }

    /// `None` once `index` no longer fits the id width.
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }
}

/// Tag of a proof step.
///
/// `Left` and `Right` name the side on which the carried sibling digest is
/// placed when it is recombined with the accumulated hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Leaf,
    Left,
    Right,
    Root,
}

impl StepKind {
    pub(crate) const fn code(self) -> u8 {
        match self {
            StepKind::Leaf => 0,
            StepKind::Left => 1,
            StepKind::Right => 2,
            StepKind::Root => 3,
        }
    }

    pub(crate) const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(StepKind::Leaf),
            1 => Some(StepKind::Left),
            2 => Some(StepKind::Right),
            3 => Some(StepKind::Root),
            _ => None,
        }
    }
}

/// One entry of an inclusion proof.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    pub kind: StepKind,
    pub digest: Digest,
}

impl ProofStep {
    pub fn new(kind: StepKind, digest: Digest) -> Self {
        Self { kind, digest }
    }

    pub fn leaf(digest: Digest) -> Self {
        Self::new(StepKind::Leaf, digest)
    }

    pub fn left(digest: Digest) -> Self {
        Self::new(StepKind::Left, digest)
    }

    pub fn right(digest: Digest) -> Self {
        Self::new(StepKind::Right, digest)
    }

    pub fn root(digest: Digest) -> Self {
        Self::new(StepKind::Root, digest)
    }
}

/// Failure reported by a hash primitive.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{reason}")]
pub struct HashError {
    pub reason: String,
}

impl HashError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Canonical serialisation error domains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerKind {
    Proof,
    Envelope,
}

/// Errors emitted by the Merkle layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MerkleError {
    #[error("failed to compute hash: {0}")]
    HashWriteFailure(#[from] HashError),
    #[error("unable to find leaf {leaf}")]
    LeafNotFound { leaf: String },
    #[error("malformed proof: {reason}")]
    MalformedProof { reason: &'static str },
    #[error("proof steps don't produce the same root hash as in the proof")]
    ProofMismatch,
    #[error("proof root hash doesn't match the tree root hash")]
    RootMismatch,
    #[error("serialisation error in {0:?}")]
    Serialization(SerKind),
    #[error("incompatible parameters: {reason}")]
    IncompatibleParams { reason: &'static str },
    #[error("tree capacity exceeded: {count} leaves")]
    TooManyLeaves { count: usize },
}

pub(crate) fn hash_failure(err: HashError) -> MerkleError {
    tracing::warn!(reason = %err, "hash primitive failed");
    MerkleError::HashWriteFailure(err)
}
