//! Heap nodes and the public handle that names them

use crate::storage::NodeId;
use crate::traits::Handle;

/// A tree node. All links are arena ids; none of them own anything.
#[derive(Debug)]
pub(crate) struct Node<K> {
    pub(crate) key: K,
    /// Number of nodes in the child ring
    pub(crate) degree: usize,
    /// Set when a non-root node loses a child; cleared whenever the node
    /// becomes a root or a child
    pub(crate) mark: bool,
    pub(crate) parent: Option<NodeId>,
    /// Any member of the child ring
    pub(crate) child: Option<NodeId>,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
}

impl<K> Node<K> {
    /// A childless, unmarked node forming a ring of one
    pub(crate) fn singleton(key: K, id: NodeId) -> Self {
        Self {
            key,
            degree: 0,
            mark: false,
            parent: None,
            child: None,
            left: id,
            right: id,
        }
    }
}

/// Handle to a node in a [`FibonacciHeap`](crate::FibonacciHeap)
///
/// Returned by [`insert`](crate::FibonacciHeap::insert) and accepted by
/// [`decrease_key`](crate::FibonacciHeap::decrease_key) and
/// [`delete`](crate::FibonacciHeap::delete). Once the node leaves the heap the
/// handle is permanently invalid and every operation taking it returns
/// [`HeapError::InvalidHandle`](crate::HeapError::InvalidHandle).
/// Handles survive [`union`](crate::FibonacciHeap::union).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRef(pub(crate) NodeId);

impl Handle for NodeRef {}
