use std::cmp::Ordering;

use log::{debug, trace};

use super::RBTree;
use super::error::DuplicateKey;
use super::node::{Color, NodePtr, is_red};

impl<K: Ord> RBTree<K> {
    /// Inserts `key`, rebalancing the tree afterwards.
    ///
    /// If an equal key is already present the tree is left untouched, and `key` is handed back
    /// inside the error.
    pub fn insert(&mut self, key: K) -> Result<(), DuplicateKey<K>> {
        let Some(mut current) = self.root else {
            let root = NodePtr::allocate(key, Color::Black, None);
            debug!("Inserted {root:p} as the root");
            self.root = Some(root);
            self.len = 1;
            return Ok(())
        };

        let node = loop {
            // SAFETY: `&mut self` means nobody else is looking at the tree, and the reference
            //         doesn't outlive this iteration.
            let current_key = unsafe { current.key() };
            match key.cmp(current_key) {
                Ordering::Less => match current.left() {
                    Some(left) => current = left,
                    None => {
                        let node = NodePtr::allocate(key, Color::Red, Some(current));
                        current.set_left(Some(node));
                        debug!("Inserted {node:p} as the left child of {current:p}");
                        break node
                    }
                },
                Ordering::Greater => match current.right() {
                    Some(right) => current = right,
                    None => {
                        let node = NodePtr::allocate(key, Color::Red, Some(current));
                        current.set_right(Some(node));
                        debug!("Inserted {node:p} as the right child of {current:p}");
                        break node
                    }
                },
                Ordering::Equal => {
                    debug!("Key already present at {current:p}, not inserting");
                    return Err(DuplicateKey::new(key))
                }
            }
        };

        self.len += 1;
        self.rebalance_after_insert(node);
        Ok(())
    }
}

impl<K> RBTree<K> {
    /// Fixes up red-red violations introduced by attaching the red `node`.
    fn rebalance_after_insert(&mut self, node: NodePtr<K>) {
        let mut current = node;

        while let Some(parent) = current.parent().filter(|parent| parent.is_red()) {
            let Some(grandparent) = parent.parent() else { break };
            trace!("Balancing at {current:p} (parent {parent:p}, grandparent {grandparent:p})");

            if grandparent.left() == Some(parent) {
                if is_red(grandparent.right()) {
                    self.color_flip(grandparent);
                } else {
                    if parent.right() == Some(current) {
                        self.rotate_left(parent);
                    }
                    self.rotate_right(grandparent);
                }
            } else if is_red(grandparent.left()) {
                self.color_flip(grandparent);
            } else {
                if parent.left() == Some(current) {
                    self.rotate_right(parent);
                }
                self.rotate_left(grandparent);
            }

            // after a flip the grandparent might now clash with its own parent, and after a
            // rotation it sits red under a black node, which ends the loop
            current = grandparent;
        }

        if let Some(root) = self.root {
            root.set_color(Color::Black);
        }
    }
}
