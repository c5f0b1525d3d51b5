//! Data structures with no internal synchronization. Wrap them in a lock to share them.

pub mod rbtree;
