use std::borrow::Borrow;

use log::{debug, trace};

use super::RBTree;
use super::node::{Color, Link, NodePtr, is_red};

impl<K> RBTree<K> {
    /// Removes `key` from the tree. Returns whether it was present.
    pub fn delete<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(key).is_some()
    }

    /// Removes `key` from the tree, returning the stored key if it was present.
    pub fn take<Q>(&mut self, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let removed = self.delete_from(self.root, key);
        if removed.is_none() {
            debug!("Key not found, nothing deleted");
        }
        removed
    }

    fn delete_from<Q>(&mut self, subtree: Link<K>, key: &Q) -> Option<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let target = self.search_from(subtree, key)?;

        match (target.left(), target.right()) {
            (None, None) => {
                if target.is_red() {
                    debug!("Deleting red leaf {target:p}");
                } else {
                    debug!("Deleting black leaf {target:p}, rebalancing first");
                    self.rebalance_after_delete(target);
                }
                self.replace_in_parent(target, None);
            }
            (Some(child), None) | (None, Some(child)) => {
                debug!("Deleting {target:p}, its only child {child:p} takes its place");
                // a node with one child is black with a red child, so blackening the child makes up
                // for the black node that's going away
                child.set_color(Color::Black);
                self.replace_in_parent(target, Some(child));
            }
            (Some(_), Some(right)) => {
                let successor = right.leftmost();
                debug!("Deleting {target:p} via its in-order successor {successor:p}");
                // `target` stays where it is with the successor's key, and the successor (which
                // has no left child) now holds `key` at the far left of the right subtree
                target.swap_keys(successor);
                return self.delete_from(Some(right), key)
            }
        }

        self.len -= 1;
        // SAFETY: `target` was just unlinked, and nothing else refers to it.
        Some(unsafe { target.free() })
    }

    /// Restores the black height around `node`, which is black and about to lose a black unit
    /// on its path (it's a black leaf that's going to be detached).
    fn rebalance_after_delete(&mut self, node: NodePtr<K>) {
        let mut current = node;

        while Some(current) != self.root && current.color() == Color::Black {
            let Some(parent) = current.parent() else { break };
            let current_is_left = parent.left() == Some(current);

            // a black non-root node's sibling subtree has black height >= 1, so it can't be empty
            let sibling = match current_is_left {
                true => parent.right(),
                false => parent.left(),
            };
            let sibling = sibling.expect("a black non-root node always has a sibling");
            let (near, far) = if current_is_left {
                (sibling.left(), sibling.right())
            } else {
                (sibling.right(), sibling.left())
            };

            if sibling.is_red() {
                trace!("Sibling {sibling:p} is red, rotating at parent {parent:p}");
                self.rotate_toward(parent, current_is_left);
            } else if !is_red(near) && !is_red(far) {
                if parent.is_red() {
                    trace!("Sibling {sibling:p} and its children are black, absorbing into red parent {parent:p}");
                    parent.set_color(Color::Black);
                    sibling.set_color(Color::Red);
                    break
                }
                trace!("Sibling {sibling:p} and parent {parent:p} are black, moving up");
                sibling.set_color(Color::Red);
                current = parent;
            } else if is_red(near) && !is_red(far) {
                trace!("Near child of sibling {sibling:p} is red, rotating at sibling");
                self.rotate_toward(sibling, !current_is_left);
            } else {
                trace!("Far child of sibling {sibling:p} is red, rotating at parent {parent:p}");
                self.rotate_toward(parent, current_is_left);
                parent.set_color(Color::Black);
                if let Some(far) = far {
                    far.set_color(Color::Black);
                }
                break
            }
        }
    }

    /// Rotates `node` so that it moves down on the `left` side (a left rotation when `left` is
    /// true, a right rotation otherwise).
    fn rotate_toward(&mut self, node: NodePtr<K>, left: bool) {
        if left {
            self.rotate_left(node)
        } else {
            self.rotate_right(node)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::non_concurrent::rbtree::tests::{assert_valid, in_order};

    #[test]
    fn delete_from_empty() {
        let mut tree = RBTree::<i32>::new();
        assert!(!tree.delete(&1));
        assert!(tree.is_empty());
    }

    #[test]
    fn delete_red_leaf() {
        let mut tree: RBTree<i32> = [20, 10, 30].into_iter().collect();
        assert!(tree.delete(&10));

        let root = tree.root().unwrap();
        assert_eq!(*root.key(), 20);
        assert!(root.left().is_none());
        assert_eq!(tree.len(), 2);
        assert_valid(&tree);
    }

    #[test]
    fn delete_only_node() {
        let mut tree: RBTree<i32> = [1].into_iter().collect();
        assert_eq!(tree.take(&1), Some(1));
        assert!(tree.root().is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn delete_node_with_one_child() {
        let mut tree: RBTree<i32> = [20, 10, 30, 40].into_iter().collect();
        // 30 is black with a single red child 40
        assert!(tree.delete(&30));

        let root = tree.root().unwrap();
        let right = root.right().unwrap();
        assert_eq!((*right.key(), right.color()), (40, Color::Black));
        assert_valid(&tree);
    }

    #[test]
    fn delete_root_with_two_children_keeps_node() {
        let mut tree: RBTree<i32> = [20, 10, 30].into_iter().collect();
        let root_before = tree.root.unwrap();

        assert!(tree.delete(&20));

        // the root node survives with its successor's key
        assert_eq!(tree.root, Some(root_before));
        assert_eq!(*tree.root().unwrap().key(), 30);
        assert_eq!(in_order(&tree), vec![10, 30]);
        assert_valid(&tree);
    }

    #[test]
    fn take_returns_the_requested_key_after_successor_swap() {
        let mut tree: RBTree<String> = ["m", "c", "x", "a", "e"].into_iter().map(String::from).collect();
        assert_eq!(tree.take("c").as_deref(), Some("c"));
        assert!(!tree.contains("c"));
        assert!(tree.contains("e"));
        assert_valid(&tree);
    }

    #[test]
    fn delete_black_leaf_with_red_sibling() {
        let mut tree = RBTree::new();
        for key in 1..=6 {
            tree.insert(key).unwrap();
        }
        // 1 is a black leaf whose sibling subtree at 4 is red
        assert!(tree.delete(&1));
        assert_eq!(in_order(&tree), vec![2, 3, 4, 5, 6]);
        assert_valid(&tree);
    }

    #[test]
    fn ascending_then_delete_smallest() {
        let mut tree = RBTree::new();
        for key in 1..=7 {
            tree.insert(key).unwrap();
        }
        assert!(tree.delete(&1));
        assert_eq!(in_order(&tree), (2..=7).collect::<Vec<_>>());
        assert_valid(&tree);
    }

    #[test]
    fn delete_twice() {
        let mut tree: RBTree<i32> = (0..32).collect();
        assert!(tree.delete(&17));
        assert!(!tree.delete(&17));
        assert_eq!(tree.len(), 31);
        assert_valid(&tree);
    }

    #[test]
    fn missing_key_leaves_tree_untouched() {
        let mut tree: RBTree<i32> = (0..50).map(|x| x * 2).collect();
        let before = tree.snapshot();
        assert!(!tree.delete(&51));
        assert_eq!(tree.snapshot(), before);
        assert_eq!(tree.len(), 50);
    }

    #[test]
    fn drain_in_every_order_class() {
        let ascending: Vec<i32> = (0..200).collect();
        let descending: Vec<i32> = ascending.iter().rev().copied().collect();
        let middle_out: Vec<i32> = (0..100).flat_map(|i| [100 + i, 99 - i]).collect();

        for order in [ascending.clone(), descending, middle_out] {
            let mut tree: RBTree<i32> = ascending.iter().copied().collect();
            for key in &order {
                assert!(tree.delete(key));
                assert_valid(&tree);
            }
            assert!(tree.is_empty());
            assert!(tree.root().is_none());
        }
    }
}
