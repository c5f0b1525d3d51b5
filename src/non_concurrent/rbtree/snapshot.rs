use super::RBTree;
use super::node::{Color, Link};

/// An owned, read-only copy of a tree's shape: for every node its key, its color and its
/// children, nested the same way the tree is.
///
/// Nothing in a snapshot points back into the tree it was taken from, so it can be kept
/// around (or rendered) while the tree keeps changing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeSnapshot<K> {
    pub key: K,
    pub color: Color,
    pub left: Option<Box<NodeSnapshot<K>>>,
    pub right: Option<Box<NodeSnapshot<K>>>,
}

impl<K> NodeSnapshot<K> {
    pub fn has_left_child(&self) -> bool {
        self.left.is_some()
    }

    pub fn has_right_child(&self) -> bool {
        self.right.is_some()
    }

    /// Every node as `(key, color, has_left_child, has_right_child)`, in pre-order.
    pub fn pre_order(&self) -> Vec<(&K, Color, bool, bool)> {
        let mut out = vec![];
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push((&node.key, node.color, node.has_left_child(), node.has_right_child()));
            // right first, so the left subtree comes off the stack first
            stack.extend(node.right.as_deref());
            stack.extend(node.left.as_deref());
        }
        out
    }
}

impl<K: Clone> RBTree<K> {
    /// Copies the tree's structure out into a [`NodeSnapshot`], or `None` if it's empty.
    pub fn snapshot(&self) -> Option<NodeSnapshot<K>> {
        snapshot_subtree(self.root)
    }
}

fn snapshot_subtree<K: Clone>(node: Link<K>) -> Option<NodeSnapshot<K>> {
    let node = node?;
    Some(NodeSnapshot {
        // SAFETY: the tree is borrowed while the snapshot is taken.
        key: unsafe { node.key() }.clone(),
        color: node.color(),
        left: snapshot_subtree(node.left()).map(Box::new),
        right: snapshot_subtree(node.right()).map(Box::new),
    })
}
