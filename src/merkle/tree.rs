use std::fmt;
use std::marker::PhantomData;
use std::ops::ControlFlow;

use crate::config::TreeConfig;
use crate::hash::HashAlgorithm;

use crate::MerkleResult;

use super::traits::{LeafValue, MerkleHasher};
use super::types::{hash_failure, Digest, MerkleError, NodeId};

/// Largest leaf count whose `2n - 1` arena slots stay addressable by a
/// [`NodeId`].
pub const MAX_LEAVES: usize = 1 << 31;

/// Structural role of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeKind<L> {
    /// Root of a tree built from no leaves.
    Empty,
    Leaf(L),
    Interior { left: NodeId, right: NodeId },
}

/// Node stored in the tree arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node<L> {
    digest: Digest,
    kind: NodeKind<L>,
    parent: Option<NodeId>,
}

impl<L> Node<L> {
    pub fn digest(&self) -> &Digest {
        &self.digest
    }

    pub fn kind(&self) -> &NodeKind<L> {
        &self.kind
    }

    /// Leaf value, present on leaf nodes only.
    pub fn leaf(&self) -> Option<&L> {
        match &self.kind {
            NodeKind::Leaf(value) => Some(value),
            _ => None,
        }
    }

    /// `(left, right)` children, present on interior nodes only.
    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Interior { left, right } => Some((left, right)),
            _ => None,
        }
    }

    /// Enclosing node, absent on the root.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf(_))
    }
}

/// Immutable binary Merkle tree over an ordered list of leaves.
///
/// Nodes live in an arena owned by the tree. Leaves occupy the first
/// `leaf_count` slots in input order, interior nodes follow in the order they
/// were completed and the root is always the last slot. Parent links are
/// arena indices, so the structure holds no reference cycles.
///
/// For `n >= 2` leaves the left subtree receives `n/2 + n%2` of them, which
/// fixes one canonical shape for every leaf ordering.
///
/// Node ids are `u32`, which caps a tree at [`MAX_LEAVES`] leaves.
pub struct MerkleTree<L, H: MerkleHasher> {
    config: TreeConfig,
    nodes: Vec<Node<L>>,
    root: NodeId,
    leaf_count: usize,
    marker: PhantomData<fn() -> H>,
}

impl<L: LeafValue, H: MerkleHasher> MerkleTree<L, H> {
    /// Builds a tree over `leaves` using the combination rule in `config`.
    ///
    /// Fails with [`MerkleError::HashWriteFailure`] as soon as the hash
    /// primitive reports an error and with [`MerkleError::TooManyLeaves`] past
    /// [`MAX_LEAVES`]; no partial tree is returned.
    pub fn build<I>(config: TreeConfig, leaves: I) -> MerkleResult<Self>
    where
        I: IntoIterator<Item = L>,
    {
        let leaves = leaves.into_iter();
        let mut nodes = Vec::with_capacity(leaves.size_hint().0.saturating_mul(2));

        for value in leaves {
            let digest = H::hash(value.canonical_string().as_bytes()).map_err(hash_failure)?;
            nodes.push(Node {
                digest,
                kind: NodeKind::Leaf(value),
                parent: None,
            });
        }

        let leaf_count = nodes.len();
        ensure_capacity(leaf_count)?;
        let root = if leaf_count == 0 {
            let digest = H::hash(&[]).map_err(hash_failure)?;
            nodes.push(Node {
                digest,
                kind: NodeKind::Empty,
                parent: None,
            });
            NodeId(0)
        } else {
            combine_range::<L, H>(&config, &mut nodes, 0, leaf_count)?
        };

        let tree = Self {
            config,
            nodes,
            root,
            leaf_count,
            marker: PhantomData,
        };
        tracing::debug!(
            leaf_count,
            depth = tree.depth(),
            root = %tree.root_digest(),
            "built merkle tree"
        );
        Ok(tree)
    }

    /// Builds a tree with [`TreeConfig::default`].
    pub fn build_default<I>(leaves: I) -> MerkleResult<Self>
    where
        I: IntoIterator<Item = L>,
    {
        Self::build(TreeConfig::default(), leaves)
    }

    /// Returns the first leaf node whose canonical string equals the query's.
    pub(crate) fn find_leaf<Q>(&self, query: &Q) -> Option<NodeId>
    where
        Q: LeafValue + ?Sized,
    {
        let wanted = query.canonical_string();
        self.leaves()
            .find(|(_, node)| {
                node.leaf()
                    .map(|value| value.canonical_string() == wanted)
                    .unwrap_or(false)
            })
            .map(|(id, _)| id)
    }
}

fn ensure_capacity(leaf_count: usize) -> MerkleResult<()> {
    if leaf_count > MAX_LEAVES {
        return Err(MerkleError::TooManyLeaves { count: leaf_count });
    }
    Ok(())
}

fn node_id(index: usize) -> MerkleResult<NodeId> {
    NodeId::from_index(index).ok_or(MerkleError::TooManyLeaves { count: index })
}

/// Recursively combines the leaves in `lo..hi` and returns the subtree root.
fn combine_range<L, H: MerkleHasher>(
    config: &TreeConfig,
    nodes: &mut Vec<Node<L>>,
    lo: usize,
    hi: usize,
) -> MerkleResult<NodeId> {
    let count = hi - lo;
    if count == 1 {
        return node_id(lo);
    }
    let midpoint = lo + count / 2 + count % 2;
    let left = combine_range::<L, H>(config, nodes, lo, midpoint)?;
    let right = combine_range::<L, H>(config, nodes, midpoint, hi)?;

    let preimage = config.interior_preimage(
        nodes[left.index()].digest.as_bytes(),
        nodes[right.index()].digest.as_bytes(),
    );
    let digest = H::hash(&preimage).map_err(hash_failure)?;

    let id = node_id(nodes.len())?;
    nodes.push(Node {
        digest,
        kind: NodeKind::Interior { left, right },
        parent: None,
    });
    nodes[left.index()].parent = Some(id);
    nodes[right.index()].parent = Some(id);
    Ok(id)
}

impl<L, H: MerkleHasher> MerkleTree<L, H> {
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn root_digest(&self) -> &Digest {
        &self.get(self.root).digest
    }

    pub fn node(&self, id: NodeId) -> Option<&Node<L>> {
        self.nodes.get(id.index())
    }

    pub(crate) fn get(&self, id: NodeId) -> &Node<L> {
        &self.nodes[id.index()]
    }

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    pub fn hash_algorithm(&self) -> HashAlgorithm {
        H::hash_algorithm()
    }

    pub fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaf_count == 0
    }

    /// Number of edges between the root and the deepest leaf.
    ///
    /// The left subtree is never smaller than the right one, so the leftmost
    /// path is always a deepest path.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut current = self.get(self.root);
        while let Some((left, _)) = current.children() {
            depth += 1;
            current = self.get(left);
        }
        depth
    }

    /// Depth-first, left-before-right iterator over the leaf nodes.
    pub fn leaves(&self) -> Leaves<'_, L> {
        Leaves {
            nodes: &self.nodes,
            stack: vec![self.root],
        }
    }

    /// Visits every leaf in input order until the visitor breaks.
    ///
    /// Returns the visitor's `Break` value when it stopped the traversal
    /// early and `Continue(())` once all leaves were visited.
    pub fn enumerate_leaves<B, F>(&self, mut visit: F) -> ControlFlow<B>
    where
        F: FnMut(&Node<L>) -> ControlFlow<B>,
    {
        for (_, node) in self.leaves() {
            visit(node)?;
        }
        ControlFlow::Continue(())
    }
}

/// Iterator returned by [`MerkleTree::leaves`].
pub struct Leaves<'a, L> {
    nodes: &'a [Node<L>],
    stack: Vec<NodeId>,
}

impl<'a, L> Iterator for Leaves<'a, L> {
    type Item = (NodeId, &'a Node<L>);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = &self.nodes[id.index()];
            match node.kind {
                NodeKind::Leaf(_) => return Some((id, node)),
                NodeKind::Interior { left, right } => {
                    self.stack.push(right);
                    self.stack.push(left);
                }
                NodeKind::Empty => {}
            }
        }
        None
    }
}

impl<L: LeafValue, H: MerkleHasher> fmt::Display for MerkleTree<L, H> {
    /// Indented dump: `- <digest>:` for interior nodes, `- <digest> (<leaf>)`
    /// for leaves, two spaces per level.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stack = vec![(self.root, 0usize)];
        let mut first = true;
        while let Some((id, indent)) = stack.pop() {
            if !first {
                writeln!(f)?;
            }
            first = false;
            let node = self.get(id);
            write!(f, "{}- {}", "  ".repeat(indent), node.digest)?;
            match &node.kind {
                NodeKind::Leaf(value) => write!(f, " ({})", value.canonical_string())?,
                NodeKind::Interior { left, right } => {
                    write!(f, ":")?;
                    stack.push((*right, indent + 1));
                    stack.push((*left, indent + 1));
                }
                NodeKind::Empty => {}
            }
        }
        Ok(())
    }
}

impl<L: fmt::Debug, H: MerkleHasher> fmt::Debug for MerkleTree<L, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("algorithm", &H::hash_algorithm())
            .field("config", &self.config)
            .field("leaf_count", &self.leaf_count)
            .field("root", self.root_digest())
            .finish()
    }
}
