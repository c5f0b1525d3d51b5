use super::RBTree;
use super::error::InvariantViolation;
use super::node::{Color, Link, is_red};

impl<K: Ord> RBTree<K> {
    /// Walks the whole tree and checks every red-black and search tree property, along with the
    /// parent pointers and the recorded length.
    ///
    /// Returns the black height of the tree (absent children count as one black node).
    ///
    /// Complexity: O(n)
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        if let Some(root) = self.root {
            if root.color() != Color::Black {
                return Err(InvariantViolation::RedRoot)
            }
            if root.parent().is_some() {
                return Err(InvariantViolation::RootHasParent)
            }
        }

        let mut counted = 0;
        let black_height = check_subtree(self.root, None, None, &mut counted)?;
        if counted != self.len {
            return Err(InvariantViolation::LengthMismatch { counted, recorded: self.len })
        }
        Ok(black_height)
    }
}

fn check_subtree<K: Ord>(node: Link<K>, lower: Option<&K>, upper: Option<&K>, counted: &mut usize) -> Result<usize, InvariantViolation> {
    let Some(node) = node else { return Ok(1) };
    *counted += 1;

    // SAFETY: the tree is borrowed for the whole walk.
    let key = unsafe { node.key() };
    if lower.is_some_and(|lower| lower >= key) || upper.is_some_and(|upper| upper <= key) {
        return Err(InvariantViolation::OutOfOrder)
    }

    for child in [node.left(), node.right()].into_iter().flatten() {
        if child.parent() != Some(node) {
            return Err(InvariantViolation::BrokenParentLink)
        }
    }

    if node.is_red() && (is_red(node.left()) || is_red(node.right())) {
        return Err(InvariantViolation::RedChildOfRed)
    }

    let left = check_subtree(node.left(), lower, Some(key), counted)?;
    let right = check_subtree(node.right(), Some(key), upper, counted)?;
    if left != right {
        return Err(InvariantViolation::BlackHeightMismatch { left, right })
    }

    Ok(left + usize::from(node.color() == Color::Black))
}
