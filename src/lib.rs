#![deny(unsafe_op_in_unsafe_fn)]

// not concurrent
pub mod non_concurrent;

// logger setup
pub mod logging;

pub use non_concurrent::rbtree::{Color, DuplicateKey, InvariantViolation, NodeRef, NodeSnapshot, RBTree};
