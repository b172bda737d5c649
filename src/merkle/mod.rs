//! Binary Merkle trees with leaf-to-root inclusion proofs.
//!
//! The module fixes the following layout:
//!
//! * **Shape:** a list of `n >= 2` leaves is split at `n/2 + n%2`; the left
//!   subtree takes the larger half. The shape is a pure function of the leaf
//!   count.
//! * **Leaves:** a leaf digest is the hash of the leaf's canonical string.
//!   An empty tree has the hash of the empty byte string as its root.
//! * **Interior nodes:** `hash(enc(left) || separator || enc(right))` where
//!   `enc` is the identity or lowercase hex, see [`TreeConfig`](crate::config::TreeConfig).
//! * **Proofs:** a `Leaf` step, one `Left`/`Right` sibling step per level and
//!   a closing `Root` step. `Left` means the sibling is hashed on the left of
//!   the accumulated value.
//! * **Hash family:** selected by the [`MerkleHasher`] type parameter of the
//!   tree. Hashers are stateless, so trees are safe to share across threads.

mod envelope;
mod proof;
mod ser;
pub mod traits;
mod tree;
mod types;

pub use envelope::ProofEnvelope;
pub use proof::{verify_proof, Proof};
pub use ser::{
    decode_envelope, decode_proof, encode_envelope, encode_proof, ENVELOPE_VERSION, PROOF_VERSION,
};
pub use traits::{LeafValue, MerkleHasher};
pub use tree::{Leaves, MerkleTree, Node, NodeKind, MAX_LEAVES};
pub use types::{Digest, HashError, MerkleError, NodeId, ProofStep, SerKind, StepKind};
