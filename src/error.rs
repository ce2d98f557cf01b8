//! Error types for heap operations and structural validation.

use thiserror::Error;

use crate::node::NodeRef;

/// Error type for heap operations
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// The new key is greater than the node's current key. Nothing was changed.
    #[error("new key is greater than current key")]
    KeyIncrease,
    /// The handle does not name a live node of this heap (it was extracted,
    /// deleted, or issued by another heap)
    #[error("handle is no longer valid (node was removed)")]
    InvalidHandle,
}

/// A broken structural invariant, reported by
/// [`FibonacciHeap::validate`](crate::FibonacciHeap::validate).
///
/// These never arise from misuse of the public API; seeing one means the
/// engine itself has a bug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("link from {0:?} points at a node that is not stored in the heap")]
    DanglingLink(NodeRef),
    #[error("ring through {0:?} is not circular and doubly consistent")]
    BrokenRing(NodeRef),
    #[error("{0:?} sits in a ring whose owner is not its parent")]
    ParentMismatch(NodeRef),
    #[error("{0:?} has a smaller key than its parent")]
    HeapOrder(NodeRef),
    #[error("{node:?} records degree {degree} but has {children} children")]
    DegreeMismatch {
        node: NodeRef,
        degree: usize,
        children: usize,
    },
    #[error("root {0:?} is marked")]
    MarkedRoot(NodeRef),
    #[error("cached minimum is missing, not a root, or not the smallest root")]
    StaleMinimum,
    #[error("size is {recorded} but {reachable} nodes are reachable")]
    SizeMismatch { recorded: usize, reachable: usize },
    #[error("{stored} nodes are stored but only {reachable} are reachable")]
    LeakedNodes { stored: usize, reachable: usize },
}
