//! Structural building blocks shared by insertion and deletion.
//!
//! Every relink in the tree goes through `replace_in_parent`, so it's the one place that has
//! to keep `parent` pointers in sync with the child pointers.

use std::borrow::Borrow;
use std::cmp::Ordering;

use log::trace;

use super::RBTree;
use super::node::{Color, Link, NodePtr};

impl<K> RBTree<K> {
    /// Points whatever linked to `old` (its parent, or the root) at `new` instead.
    ///
    /// `old`'s own links are left alone.
    pub(super) fn replace_in_parent(&mut self, old: NodePtr<K>, new: Link<K>) {
        let parent = old.parent();
        match parent {
            None => self.root = new,
            Some(parent) if parent.left() == Some(old) => parent.set_left(new),
            Some(parent) => parent.set_right(new),
        }
        if let Some(new) = new {
            new.set_parent(parent);
        }
    }

    /// Rotates the subtree at `node` to the left, promoting its right child.
    ///
    /// The promoted child takes over `node`'s color, and `node` becomes red.
    pub(super) fn rotate_left(&mut self, node: NodePtr<K>) {
        trace!("Rotating left at {node:p}");
        let pivot = node.right().expect("rotate_left needs a right child to promote");

        let inner = pivot.left();
        node.set_right(inner);
        if let Some(inner) = inner {
            inner.set_parent(Some(node));
        }

        self.replace_in_parent(node, Some(pivot));
        pivot.set_left(Some(node));
        node.set_parent(Some(pivot));

        pivot.set_color(node.color());
        node.set_color(Color::Red);
    }

    /// Mirror image of [`rotate_left`](Self::rotate_left).
    pub(super) fn rotate_right(&mut self, node: NodePtr<K>) {
        trace!("Rotating right at {node:p}");
        let pivot = node.left().expect("rotate_right needs a left child to promote");

        let inner = pivot.right();
        node.set_left(inner);
        if let Some(inner) = inner {
            inner.set_parent(Some(node));
        }

        self.replace_in_parent(node, Some(pivot));
        pivot.set_right(Some(node));
        node.set_parent(Some(pivot));

        pivot.set_color(node.color());
        node.set_color(Color::Red);
    }

    /// Pushes blackness down: `node` turns red and both of its children turn black.
    pub(super) fn color_flip(&mut self, node: NodePtr<K>) {
        trace!("Flipping colors at {node:p}");
        debug_assert!(node.left().is_some() && node.right().is_some(), "color flip on a node missing a child");

        node.set_color(Color::Red);
        if let Some(left) = node.left() {
            left.set_color(Color::Black);
        }
        if let Some(right) = node.right() {
            right.set_color(Color::Black);
        }
    }

    /// Plain BST descent starting at `subtree`.
    pub(super) fn search_from<Q>(&self, subtree: Link<K>, key: &Q) -> Link<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = subtree;
        while let Some(node) = current {
            // SAFETY: `&self` keeps the node alive, and the reference dies at the end of this iteration.
            let node_key = unsafe { node.key() };
            current = match key.cmp(node_key.borrow()) {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Some(node),
            };
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::non_concurrent::rbtree::node::is_red;

    fn shape(tree: &RBTree<i32>) -> Vec<(i32, Color, bool, bool)> {
        fn walk(node: Link<i32>, out: &mut Vec<(i32, Color, bool, bool)>) {
            let Some(node) = node else { return };
            out.push((unsafe { *node.key() }, node.color(), node.left().is_some(), node.right().is_some()));
            walk(node.left(), out);
            walk(node.right(), out);
        }
        let mut out = vec![];
        walk(tree.root, &mut out);
        out
    }

    fn parent_links_consistent(node: Link<i32>) -> bool {
        let Some(node) = node else { return true };
        node.left().is_none_or(|l| l.parent() == Some(node))
            && node.right().is_none_or(|r| r.parent() == Some(node))
            && parent_links_consistent(node.left())
            && parent_links_consistent(node.right())
    }

    // Builds   2(B)
    //         /    \
    //       1(B)   4(B)
    //             /   \
    //           3(B)  5(B)
    // by hand, so the rotations can be tested on their own.
    fn hand_built() -> RBTree<i32> {
        let mut tree = RBTree::new();
        let two = NodePtr::allocate(2, Color::Black, None);
        let one = NodePtr::allocate(1, Color::Black, Some(two));
        let four = NodePtr::allocate(4, Color::Black, Some(two));
        let three = NodePtr::allocate(3, Color::Black, Some(four));
        let five = NodePtr::allocate(5, Color::Black, Some(four));
        two.set_left(Some(one));
        two.set_right(Some(four));
        four.set_left(Some(three));
        four.set_right(Some(five));
        tree.root = Some(two);
        tree.len = 5;
        tree
    }

    #[test]
    fn rotate_left_promotes_right_child() {
        let mut tree = hand_built();
        let two = tree.root.unwrap();
        tree.rotate_left(two);

        assert_eq!(shape(&tree), vec![
            (4, Color::Black, true, true),
            (2, Color::Red, true, true),
            (1, Color::Black, false, false),
            (3, Color::Black, false, false),
            (5, Color::Black, false, false),
        ]);
        assert!(tree.root.unwrap().parent().is_none());
        assert!(parent_links_consistent(tree.root));
    }

    #[test]
    fn rotations_are_inverse_in_shape() {
        let mut tree = hand_built();
        let before: Vec<_> = shape(&tree).into_iter().map(|(k, _, l, r)| (k, l, r)).collect();

        let two = tree.root.unwrap();
        tree.rotate_left(two);
        let four = tree.root.unwrap();
        tree.rotate_right(four);

        let after: Vec<_> = shape(&tree).into_iter().map(|(k, _, l, r)| (k, l, r)).collect();
        assert_eq!(before, after);
        assert!(parent_links_consistent(tree.root));
    }

    #[test]
    fn rotation_below_root_relinks_grandparent() {
        let mut tree = hand_built();
        let four = tree.root.unwrap().right().unwrap();
        tree.rotate_right(four);

        // 3 moves up into 4's old slot under 2
        let three = tree.root.unwrap().right().unwrap();
        assert_eq!(unsafe { *three.key() }, 3);
        assert_eq!(three.parent(), tree.root);
        assert_eq!(three.right(), Some(four));
        assert!(four.is_red());
        assert!(parent_links_consistent(tree.root));
    }

    #[test]
    fn color_flip_pushes_black_down() {
        let mut tree = hand_built();
        let four = tree.root.unwrap().right().unwrap();
        tree.color_flip(four);

        assert!(four.is_red());
        assert!(!is_red(four.left()));
        assert!(!is_red(four.right()));
    }

    #[test]
    fn replace_in_parent_at_root() {
        let mut tree = hand_built();
        let two = tree.root.unwrap();
        let four = two.right().unwrap();
        tree.replace_in_parent(two, Some(four));

        assert_eq!(tree.root, Some(four));
        assert!(four.parent().is_none());

        // put it back together so `Drop` sees the whole tree
        tree.root = Some(two);
        four.set_parent(Some(two));
    }

    #[test]
    fn search_from_subtree() {
        let tree = hand_built();
        let four = tree.root.unwrap().right();
        assert!(tree.search_from(four, &5).is_some());
        assert!(tree.search_from(four, &1).is_none());
        assert!(tree.search_from(None, &1).is_none());
    }
}
