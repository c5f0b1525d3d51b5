use std::fmt;

/// Returned by [`RBTree::insert`](super::RBTree::insert) when an equal key is already in the
/// tree. The tree is unchanged, and the rejected key can be taken back out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKey<K> {
    key: K,
}

impl<K> DuplicateKey<K> {
    pub(super) fn new(key: K) -> Self {
        Self { key }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn into_key(self) -> K {
        self.key
    }
}

impl<K> fmt::Display for DuplicateKey<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("key is already present in the tree")
    }
}

impl<K: fmt::Debug> std::error::Error for DuplicateKey<K> {}


/// A broken red-black or search tree property, found by
/// [`RBTree::check_invariants`](super::RBTree::check_invariants).
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The root is red.
    RedRoot,
    /// The root has a parent pointer.
    RootHasParent,
    /// A red node has a red child.
    RedChildOfRed,
    /// Two paths down from the same node pass through different numbers of black nodes.
    BlackHeightMismatch { left: usize, right: usize },
    /// A key is not strictly between the keys bounding its subtree.
    OutOfOrder,
    /// A child's parent pointer doesn't point back at the node that owns it.
    BrokenParentLink,
    /// The number of reachable nodes disagrees with the recorded length.
    LengthMismatch { counted: usize, recorded: usize },
}

impl fmt::Display for InvariantViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RedRoot => f.write_str("root is red"),
            Self::RootHasParent => f.write_str("root has a parent"),
            Self::RedChildOfRed => f.write_str("red node has a red child"),
            Self::BlackHeightMismatch { left, right } => {
                write!(f, "black height differs between subtrees ({left} on the left, {right} on the right)")
            }
            Self::OutOfOrder => f.write_str("keys are out of order"),
            Self::BrokenParentLink => f.write_str("parent pointer does not match child pointer"),
            Self::LengthMismatch { counted, recorded } => {
                write!(f, "found {counted} nodes but the tree records {recorded}")
            }
        }
    }
}

impl std::error::Error for InvariantViolation {}
