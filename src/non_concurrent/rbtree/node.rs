use std::fmt;
use std::marker::PhantomData;
use std::ptr::{self, NonNull};

/// The color of a node in an [`RBTree`](super::RBTree).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

pub(super) struct RBTreeNode<K> {
    key: K,
    color: Color,
    // NOTE: `left` and `right` own their targets, `parent` never does.
    parent: Link<K>,
    left: Link<K>,
    right: Link<K>,
}

pub(super) type Link<K> = Option<NodePtr<K>>;

/// A pointer to a node owned by some `RBTree`.
///
/// A `NodePtr` is only ever created by `NodePtr::allocate`, and is never used after
/// `NodePtr::free`. The tree is the only thing holding these, and it never hands them out,
/// so every accessor here can assume the node is live. None of the accessors hold onto a
/// reference past their return, except `key`, which is why that one is `unsafe`.
#[repr(transparent)]
pub(super) struct NodePtr<K>(NonNull<RBTreeNode<K>>);

impl<K> Clone for NodePtr<K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodePtr<K> {}

impl<K> PartialEq for NodePtr<K> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<K> Eq for NodePtr<K> {}

impl<K> fmt::Pointer for NodePtr<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Pointer::fmt(&self.0, f)
    }
}

impl<K> fmt::Debug for NodePtr<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodePtr({:p})", self.0)
    }
}

impl<K> NodePtr<K> {
    pub(super) fn allocate(key: K, color: Color, parent: Link<K>) -> Self {
        let node = Box::new(RBTreeNode { key, color, parent, left: None, right: None });
        Self(NonNull::from(Box::leak(node)))
    }

    /// Deallocates the node, handing back its key.
    ///
    /// SAFETY: the node must already be unlinked from its tree (nothing reachable from the
    ///         root may point at it), and this must be the last use of this `NodePtr`.
    pub(super) unsafe fn free(self) -> K {
        // SAFETY: the node was allocated by `Box` in `allocate`, and the caller guarantees
        //         nobody else will touch it again.
        let node = unsafe { Box::from_raw(self.0.as_ptr()) };
        node.key
    }

    /// SAFETY: the caller picks `'a`, and must make sure the node is neither freed nor has its
    ///         key swapped while the reference is alive.
    pub(super) unsafe fn key<'a>(self) -> &'a K {
        // SAFETY: the node is live, and the caller upholds the lifetime contract above.
        unsafe { &(*self.0.as_ptr()).key }
    }

    /// Exchanges the keys stored in two nodes without moving the nodes themselves.
    pub(super) fn swap_keys(self, other: Self) {
        if self == other { return }
        // SAFETY: both nodes are live and distinct, and no references into either key are held.
        unsafe { ptr::swap(&raw mut (*self.0.as_ptr()).key, &raw mut (*other.0.as_ptr()).key) }
    }

    pub(super) fn color(self) -> Color {
        // SAFETY: the node is live (see `NodePtr`), and no reference outlives this line.
        unsafe { (*self.0.as_ptr()).color }
    }

    pub(super) fn set_color(self, color: Color) {
        // SAFETY: the node is live (see `NodePtr`), and no reference outlives this line.
        unsafe { (*self.0.as_ptr()).color = color }
    }

    pub(super) fn is_red(self) -> bool {
        self.color() == Color::Red
    }

    pub(super) fn parent(self) -> Link<K> {
        // SAFETY: the node is live (see `NodePtr`), and no reference outlives this line.
        unsafe { (*self.0.as_ptr()).parent }
    }

    pub(super) fn set_parent(self, parent: Link<K>) {
        // SAFETY: the node is live (see `NodePtr`), and no reference outlives this line.
        unsafe { (*self.0.as_ptr()).parent = parent }
    }

    pub(super) fn left(self) -> Link<K> {
        // SAFETY: the node is live (see `NodePtr`), and no reference outlives this line.
        unsafe { (*self.0.as_ptr()).left }
    }

    pub(super) fn set_left(self, left: Link<K>) {
        // SAFETY: the node is live (see `NodePtr`), and no reference outlives this line.
        unsafe { (*self.0.as_ptr()).left = left }
    }

    pub(super) fn right(self) -> Link<K> {
        // SAFETY: the node is live (see `NodePtr`), and no reference outlives this line.
        unsafe { (*self.0.as_ptr()).right }
    }

    pub(super) fn set_right(self, right: Link<K>) {
        // SAFETY: the node is live (see `NodePtr`), and no reference outlives this line.
        unsafe { (*self.0.as_ptr()).right = right }
    }

    /// Walks leftward until there's no left child.
    pub(super) fn leftmost(self) -> Self {
        let mut current = self;
        while let Some(left) = current.left() {
            current = left;
        }
        current
    }
}

/// Absent nodes count as black.
pub(super) fn is_red<K>(node: Link<K>) -> bool {
    node.is_some_and(NodePtr::is_red)
}


/// A read-only handle to a node inside an [`RBTree`](super::RBTree).
///
/// The handle borrows the tree, so the tree can't change shape underneath it. It can walk
/// down to children, but never back up to the parent.
pub struct NodeRef<'a, K> {
    ptr: NodePtr<K>,
    _tree: PhantomData<&'a RBTreeNode<K>>,
}

// SAFETY: a `NodeRef` only hands out `&K`s, so it's exactly as shareable as `&K`.
unsafe impl<K: Sync> Send for NodeRef<'_, K> {}
unsafe impl<K: Sync> Sync for NodeRef<'_, K> {}

impl<K> Clone for NodeRef<'_, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K> Copy for NodeRef<'_, K> {}

impl<'a, K> NodeRef<'a, K> {
    pub(super) fn new(ptr: NodePtr<K>) -> Self {
        Self { ptr, _tree: PhantomData }
    }

    pub fn key(&self) -> &'a K {
        // SAFETY: the tree is borrowed for `'a`, so nothing can free the node or swap its key.
        unsafe { self.ptr.key() }
    }

    pub fn color(&self) -> Color {
        self.ptr.color()
    }

    pub fn is_red(&self) -> bool {
        self.ptr.is_red()
    }

    pub fn left(&self) -> Option<NodeRef<'a, K>> {
        self.ptr.left().map(NodeRef::new)
    }

    pub fn right(&self) -> Option<NodeRef<'a, K>> {
        self.ptr.right().map(NodeRef::new)
    }

    /// The node with the smallest key in the subtree rooted at this node.
    pub fn find_min(self) -> NodeRef<'a, K> {
        NodeRef::new(self.ptr.leftmost())
    }
}

impl<K: fmt::Debug> fmt::Debug for NodeRef<'_, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("key", self.key())
            .field("color", &self.color())
            .field("left", &self.left())
            .field("right", &self.right())
            .finish()
    }
}
