//! A red-black tree over unique, totally ordered keys.
//!
//! Nodes live on the heap and are linked with raw pointers: `left`/`right` own their
//! children, `parent` is a plain back-pointer used to walk upwards while rebalancing.
//! After every public operation the tree satisfies:
//!
//! 1. in-order keys are strictly increasing
//! 2. the root is black
//! 3. no red node has a red child
//! 4. every path from a node down to an absent child passes the same number of black nodes
//!    (absent children count as black)
//!
//! ```
//! use rbtree::RBTree;
//!
//! let mut tree = RBTree::new();
//! for key in [10, 20, 30] {
//!     tree.insert(key).unwrap();
//! }
//! assert_eq!(tree.root().map(|root| *root.key()), Some(20));
//! assert!(tree.insert(20).is_err());
//! assert!(tree.delete(&10));
//! assert!(!tree.delete(&10));
//! ```

use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;

mod delete;
mod error;
mod insert;
mod node;
mod primitives;
mod snapshot;
mod verify;

pub use error::{DuplicateKey, InvariantViolation};
pub use node::{Color, NodeRef};
pub use snapshot::NodeSnapshot;

use node::{Link, NodePtr, RBTreeNode};

// PROVE: any node with height `h` has black height at least `h/2`
// PROVE: the subtree located at any node `x` contains at least `2^bh(x) - 1` nodes (use induction)
// LEMMA: An RBTree with `n` internal nodes has height at most `2*log₂(n+1)`

pub struct RBTree<K> {
    root: Link<K>,
    len: usize,
    _owns: PhantomData<Box<RBTreeNode<K>>>,
}

// SAFETY: the tree owns all of its nodes exclusively (like a `Box`), so sending it sends the keys,
//         and sharing it only ever hands out `&K`s.
unsafe impl<K: Send> Send for RBTree<K> {}
unsafe impl<K: Sync> Sync for RBTree<K> {}

impl<K> RBTree<K> {
    pub const fn new() -> Self {
        Self { root: None, len: 0, _owns: PhantomData }
    }

    /// The number of keys in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn root(&self) -> Option<NodeRef<'_, K>> {
        self.root.map(NodeRef::new)
    }

    /// Finds the node holding `key`.
    ///
    /// Complexity: O(log(n))
    pub fn search<Q>(&self, key: &Q) -> Option<NodeRef<'_, K>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search_from(self.root, key).map(NodeRef::new)
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }

    /// The node with the smallest key, if any.
    ///
    /// Complexity: O(log(n))
    pub fn find_min(&self) -> Option<NodeRef<'_, K>> {
        self.root().map(NodeRef::find_min)
    }

    /// The number of nodes on the longest path from the root down to a leaf.
    ///
    /// Complexity: O(n)
    pub fn height(&self) -> usize {
        let mut height = 0;
        let mut stack: Vec<(NodePtr<K>, usize)> = self.root.map(|root| (root, 1)).into_iter().collect();
        while let Some((node, depth)) = stack.pop() {
            height = height.max(depth);
            stack.extend(node.left().map(|left| (left, depth + 1)));
            stack.extend(node.right().map(|right| (right, depth + 1)));
        }
        height
    }

    /// Removes every key, freeing all nodes.
    pub fn clear(&mut self) {
        let mut stack: Vec<NodePtr<K>> = self.root.take().into_iter().collect();
        while let Some(node) = stack.pop() {
            stack.extend(node.left());
            stack.extend(node.right());
            // SAFETY: the root link is already gone, and each node is popped exactly once, after
            //         its children have been pushed, so nothing touches it again.
            drop(unsafe { node.free() });
        }
        self.len = 0;
    }
}

impl<K> Drop for RBTree<K> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<K> Default for RBTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

/// Duplicate keys are skipped.
impl<K: Ord> FromIterator<K> for RBTree<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

/// Duplicate keys are skipped.
impl<K: Ord> Extend<K> for RBTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            let _ = self.insert(key);
        }
    }
}

impl<K: fmt::Debug> fmt::Debug for RBTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RBTree")
            .field("len", &self.len)
            .field("root", &self.root())
            .finish()
    }
}
