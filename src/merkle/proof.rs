use std::ops::ControlFlow;

use serde::{Deserialize, Serialize};

use crate::config::TreeConfig;
use crate::MerkleResult;

use super::traits::{LeafValue, MerkleHasher};
use super::tree::{MerkleTree, Node, NodeKind};
use super::types::{hash_failure, Digest, MerkleError, NodeId, ProofStep, StepKind};

/// Inclusion proof ordered leaf-first, root-last.
///
/// A well-formed proof starts with one [`StepKind::Leaf`] step, ends with one
/// [`StepKind::Root`] step and carries only `Left`/`Right` sibling steps in
/// between.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Proof {
    steps: Vec<ProofStep>,
}

impl Proof {
    pub fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    pub fn steps_mut(&mut self) -> &mut [ProofStep] {
        &mut self.steps
    }

    pub fn into_steps(self) -> Vec<ProofStep> {
        self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Digest carried by the leading `Leaf` step.
    pub fn leaf_digest(&self) -> Option<&Digest> {
        self.steps
            .first()
            .filter(|step| step.kind == StepKind::Leaf)
            .map(|step| &step.digest)
    }

    /// Root digest claimed by the trailing `Root` step.
    pub fn claimed_root(&self) -> Option<&Digest> {
        self.steps
            .last()
            .filter(|step| step.kind == StepKind::Root)
            .map(|step| &step.digest)
    }
}

impl From<Vec<ProofStep>> for Proof {
    fn from(steps: Vec<ProofStep>) -> Self {
        Self::new(steps)
    }
}

impl<L: LeafValue, H: MerkleHasher> MerkleTree<L, H> {
    /// Builds the inclusion proof for the first leaf whose canonical string
    /// equals `leaf`'s.
    ///
    /// The leading digest is recomputed from `leaf` rather than copied from
    /// the tree.
    pub fn find_proof_for<Q>(&self, leaf: &Q) -> MerkleResult<Proof>
    where
        Q: LeafValue + ?Sized,
    {
        let found = self
            .find_leaf(leaf)
            .ok_or_else(|| MerkleError::LeafNotFound {
                leaf: leaf.canonical_string().into_owned(),
            })?;
        let leaf_digest = H::hash(leaf.canonical_string().as_bytes()).map_err(hash_failure)?;

        let mut steps = Vec::with_capacity(self.depth() + 2);
        steps.push(ProofStep::leaf(leaf_digest));
        let mut current = found;
        while let Some(parent) = self.get(current).parent() {
            if let Some((left, right)) = self.get(parent).children() {
                if left == current {
                    steps.push(ProofStep::right(self.get(right).digest().clone()));
                } else {
                    steps.push(ProofStep::left(self.get(left).digest().clone()));
                }
            }
            current = parent;
        }
        steps.push(ProofStep::root(self.get(current).digest().clone()));

        tracing::trace!(steps = steps.len(), "generated merkle proof");
        Ok(Proof::new(steps))
    }

    /// Visits every leaf together with its proof in one traversal.
    ///
    /// Sibling steps collected on the way down are shared by both subtrees of
    /// a node. The proofs equal those of [`Self::find_proof_for`] and the
    /// traversal stops as soon as the visitor breaks, handing its `Break`
    /// value (for instance an error) back to the caller.
    pub fn enumerate_with_proofs<B, F>(&self, mut visit: F) -> ControlFlow<B>
    where
        F: FnMut(&Node<L>, Proof) -> ControlFlow<B>,
    {
        let mut ancestors = Vec::with_capacity(self.depth());
        self.walk_with_ancestors(self.root(), &mut ancestors, &mut visit)
    }

    fn walk_with_ancestors<B, F>(
        &self,
        id: NodeId,
        ancestors: &mut Vec<ProofStep>,
        visit: &mut F,
    ) -> ControlFlow<B>
    where
        F: FnMut(&Node<L>, Proof) -> ControlFlow<B>,
    {
        let node = self.get(id);
        match *node.kind() {
            NodeKind::Empty => ControlFlow::Continue(()),
            NodeKind::Leaf(_) => {
                let mut steps = Vec::with_capacity(ancestors.len() + 2);
                steps.push(ProofStep::leaf(node.digest().clone()));
                steps.extend(ancestors.iter().rev().cloned());
                steps.push(ProofStep::root(self.root_digest().clone()));
                visit(node, Proof::new(steps))
            }
            NodeKind::Interior { left, right } => {
                ancestors.push(ProofStep::right(self.get(right).digest().clone()));
                let flow = self.walk_with_ancestors(left, ancestors, visit);
                ancestors.pop();
                flow?;

                ancestors.push(ProofStep::left(self.get(left).digest().clone()));
                let flow = self.walk_with_ancestors(right, ancestors, visit);
                ancestors.pop();
                flow
            }
        }
    }

    /// Collects every leaf with its proof, in leaf order.
    pub fn proofs(&self) -> Vec<(&L, Proof)> {
        let mut proofs = Vec::with_capacity(self.leaf_count());
        let _ = self.enumerate_with_proofs(|_, proof| {
            proofs.push(proof);
            ControlFlow::<()>::Continue(())
        });
        self.leaves()
            .filter_map(|(_, node)| node.leaf())
            .zip(proofs)
            .collect()
    }

    /// Replays `proof` against this tree's configuration and root.
    pub fn check_proof(&self, proof: &Proof) -> MerkleResult<()> {
        verify_proof::<H>(self.config(), self.root_digest(), proof)
    }
}

/// Replays `proof` against a known `root` produced with `config` and `H`.
///
/// Shape errors are reported as [`MerkleError::MalformedProof`] before any
/// hashing happens. A proof whose recombined hash differs from its own root
/// step fails with [`MerkleError::ProofMismatch`]; one that is internally
/// consistent but does not end in `root` fails with
/// [`MerkleError::RootMismatch`].
pub fn verify_proof<H: MerkleHasher>(
    config: &TreeConfig,
    root: &Digest,
    proof: &Proof,
) -> MerkleResult<()> {
    let result = replay::<H>(config, root, proof.steps());
    if let Err(err) = &result {
        tracing::debug!(error = %err, steps = proof.len(), "rejected merkle proof");
    }
    result
}

fn replay<H: MerkleHasher>(
    config: &TreeConfig,
    root: &Digest,
    steps: &[ProofStep],
) -> Result<(), MerkleError> {
    let (first, interior, last) = split_bookends(steps)?;

    let mut accumulated = first.digest.clone();
    for step in interior {
        let preimage = match step.kind {
            StepKind::Left => {
                config.interior_preimage(step.digest.as_bytes(), accumulated.as_bytes())
            }
            StepKind::Right => {
                config.interior_preimage(accumulated.as_bytes(), step.digest.as_bytes())
            }
            StepKind::Leaf | StepKind::Root => return Err(interior_tag_error()),
        };
        accumulated = H::hash(&preimage).map_err(hash_failure)?;
    }

    if accumulated != last.digest {
        return Err(MerkleError::ProofMismatch);
    }
    if &accumulated != root {
        return Err(MerkleError::RootMismatch);
    }
    Ok(())
}

fn split_bookends(
    steps: &[ProofStep],
) -> Result<(&ProofStep, &[ProofStep], &ProofStep), MerkleError> {
    let [first, interior @ .., last] = steps else {
        return Err(MerkleError::MalformedProof {
            reason: "proof must contain a leaf and a root step",
        });
    };
    if first.kind != StepKind::Leaf {
        return Err(MerkleError::MalformedProof {
            reason: "first entry must be the hash of the leaf node",
        });
    }
    if last.kind != StepKind::Root {
        return Err(MerkleError::MalformedProof {
            reason: "last entry must be the hash of the root node",
        });
    }
    if interior
        .iter()
        .any(|step| matches!(step.kind, StepKind::Leaf | StepKind::Root))
    {
        return Err(interior_tag_error());
    }
    Ok((first, interior, last))
}

fn interior_tag_error() -> MerkleError {
    MerkleError::MalformedProof {
        reason: "interior entries must be left or right siblings",
    }
}
