//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a data structure for priority queue operations with:
//! - O(1) amortized insert, find_min, decrease_key, and union
//! - O(log n) amortized extract_min and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list and the heap caches the minimum root. Work is
//! deferred: insert and union only splice rings, and the trees are tidied up by
//! consolidation the next time the minimum is extracted. Decrease-key cuts a node
//! loose when it would violate heap order; marks on ancestors bound how much
//! cascading cutting can happen, which is what keeps tree degrees logarithmic.
//!
//! Nodes live in an arena (see [`crate::storage`]), so handles are plain ids and
//! using one after its node left the heap is reported, not undefined.

use std::fmt;
use std::mem;

use tracing::{debug, trace};

use crate::error::HeapError;
use crate::node::{Node, NodeRef};
use crate::ring::{self, RingIter};
use crate::storage::{NodeId, NodeStorage};

/// Fibonacci Heap
///
/// A min-heap over keys of any totally ordered type.
///
/// # Example
///
/// ```rust
/// use fibheap_engine::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let five = heap.insert(5);
/// heap.insert(3);
/// heap.decrease_key(five, 1).unwrap();
/// assert_eq!(heap.find_min(), Some(&1));
/// assert_eq!(heap.extract_min().map(|(_, key)| key), Some(1));
/// ```
pub struct FibonacciHeap<K> {
    pub(crate) nodes: NodeStorage<K>,
    /// Smallest root; doubles as the head of the root ring
    pub(crate) min: Option<NodeId>,
    pub(crate) len: usize,
}

impl<K: Ord> Default for FibonacciHeap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> FibonacciHeap<K> {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self {
            nodes: NodeStorage::default(),
            min: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Inserts a key as a new single-node tree and returns its handle.
    ///
    /// # Time Complexity
    /// O(1)
    pub fn insert(&mut self, key: K) -> NodeRef {
        let id = self.nodes.insert_with(|id| Node::singleton(key, id));
        ring::insert_into_ring(&mut self.nodes, self.min, id);
        match self.min {
            Some(min) if self.nodes[min].key <= self.nodes[id].key => {}
            _ => self.min = Some(id),
        }
        self.len += 1;
        trace!(len = self.len, "insert");
        self.check_invariants();
        NodeRef(id)
    }

    /// Returns the smallest key, or `None` if the heap is empty.
    pub fn find_min(&self) -> Option<&K> {
        self.min.map(|min| &self.nodes[min].key)
    }

    /// Returns the handle of the node holding the smallest key
    pub fn min_handle(&self) -> Option<NodeRef> {
        self.min.map(NodeRef)
    }

    /// Removes the minimum and returns its key together with its (now stale)
    /// handle, so callers that index handles can drop the entry.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn extract_min(&mut self) -> Option<(NodeRef, K)> {
        let min = self.min?;
        let key = self.extract_root(min);
        self.check_invariants();
        Some((NodeRef(min), key))
    }

    /// Melds two heaps into a new one, consuming both.
    ///
    /// Handles issued by either heap stay valid on the result. When the two
    /// minima tie, `self`'s minimum is kept.
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn union(self, other: Self) -> Self {
        let FibonacciHeap { nodes, min, len } = self;
        let FibonacciHeap {
            nodes: other_nodes,
            min: other_min,
            len: other_len,
        } = other;

        let mut nodes = nodes.merge(other_nodes);
        let min = match (min, other_min) {
            (Some(a), Some(b)) => {
                ring::concatenate_rings(&mut nodes, a, b);
                if nodes[b].key < nodes[a].key {
                    Some(b)
                } else {
                    Some(a)
                }
            }
            (a, b) => a.or(b),
        };

        let heap = FibonacciHeap {
            nodes,
            min,
            len: len + other_len,
        };
        debug!(
            left = len,
            right = other_len,
            segments = heap.nodes.segment_count(),
            "union"
        );
        heap.check_invariants();
        heap
    }

    /// Lowers the key of a node.
    ///
    /// A key equal to the current one is accepted and changes nothing.
    ///
    /// # Errors
    /// - [`HeapError::InvalidHandle`] if the node is no longer in this heap
    /// - [`HeapError::KeyIncrease`] if `new_key` is greater than the current
    ///   key; the heap is left untouched
    ///
    /// # Time Complexity
    /// O(1) amortized
    pub fn decrease_key(&mut self, handle: NodeRef, new_key: K) -> Result<(), HeapError> {
        let x = handle.0;
        let node = self.nodes.get_mut(x).ok_or(HeapError::InvalidHandle)?;
        if new_key > node.key {
            return Err(HeapError::KeyIncrease);
        }
        node.key = new_key;

        if let Some(parent) = node.parent {
            if self.nodes[x].key < self.nodes[parent].key {
                self.cut(x, parent);
                self.cascading_cut(parent);
            }
        }

        // Only a root can undercut the minimum: a child is never smaller than
        // the root of its tree.
        if let Some(min) = self.min {
            if self.nodes[x].key < self.nodes[min].key {
                self.min = Some(x);
            }
        }
        self.check_invariants();
        Ok(())
    }

    /// Removes a node and returns its key.
    ///
    /// Acts like decreasing the key below every other key and extracting the
    /// minimum, without needing a "minus infinity" key value.
    ///
    /// # Errors
    /// [`HeapError::InvalidHandle`] if the node is no longer in this heap.
    ///
    /// # Time Complexity
    /// O(log n) amortized
    pub fn delete(&mut self, handle: NodeRef) -> Result<K, HeapError> {
        let x = handle.0;
        let parent = self.nodes.get(x).ok_or(HeapError::InvalidHandle)?.parent;
        if let Some(parent) = parent {
            self.cut(x, parent);
            self.cascading_cut(parent);
        }
        self.min = Some(x);
        let key = self.extract_root(x);
        self.check_invariants();
        Ok(key)
    }

    /// Removes every node and returns how many were released.
    ///
    /// Nodes are released children first with an explicit worklist, so tree
    /// depth never turns into call depth. Outstanding handles become invalid.
    pub fn clear(&mut self) -> usize {
        let order = ring::post_order(&self.nodes, self.min);
        for &id in &order {
            self.nodes.take(id);
        }
        debug_assert_eq!(order.len(), self.len);
        self.min = None;
        self.len = 0;
        self.nodes = NodeStorage::default();
        debug!(released = order.len(), "clear");
        order.len()
    }

    /// Releases every node and the heap itself.
    pub fn dispose(mut self) -> usize {
        self.clear()
    }

    /// The key stored under `handle`
    pub fn key(&self, handle: NodeRef) -> Result<&K, HeapError> {
        self.node(handle).map(|node| &node.key)
    }

    /// Whether `handle` names a node that is still in this heap
    pub fn contains(&self, handle: NodeRef) -> bool {
        self.nodes.contains(handle.0)
    }

    /// Number of direct children of the node
    pub fn degree(&self, handle: NodeRef) -> Result<usize, HeapError> {
        self.node(handle).map(|node| node.degree)
    }

    /// Whether the node has lost a child since it last became a child
    pub fn is_marked(&self, handle: NodeRef) -> Result<bool, HeapError> {
        self.node(handle).map(|node| node.mark)
    }

    pub fn is_root(&self, handle: NodeRef) -> Result<bool, HeapError> {
        self.node(handle).map(|node| node.parent.is_none())
    }

    pub fn parent(&self, handle: NodeRef) -> Result<Option<NodeRef>, HeapError> {
        self.node(handle).map(|node| node.parent.map(NodeRef))
    }

    /// Keys of the root ring, starting at the minimum.
    ///
    /// Diagnostic view; the order of the other roots is unspecified.
    pub fn root_keys(&self) -> RingIter<'_, K> {
        RingIter::new(&self.nodes, self.min)
    }

    pub fn root_count(&self) -> usize {
        self.min
            .map_or(0, |min| ring::ring_members(&self.nodes, min).len())
    }

    /// Largest degree of any node in the heap
    pub fn max_degree(&self) -> usize {
        self.nodes.iter().map(|node| node.degree).max().unwrap_or(0)
    }

    fn node(&self, handle: NodeRef) -> Result<&Node<K>, HeapError> {
        self.nodes.get(handle.0).ok_or(HeapError::InvalidHandle)
    }

    /// Detaches the root `z`, which must be the cached minimum, promotes its
    /// children to roots, consolidates, and frees `z`.
    fn extract_root(&mut self, z: NodeId) -> K {
        debug_assert_eq!(self.min, Some(z));

        if let Some(child) = self.nodes[z].child.take() {
            // The ring changes under us as children move, so walk a snapshot.
            for c in ring::ring_members(&self.nodes, child) {
                let node = &mut self.nodes[c];
                node.parent = None;
                node.mark = false;
                ring::insert_into_ring(&mut self.nodes, Some(z), c);
            }
            self.nodes[z].degree = 0;
        }

        self.min = ring::remove_from_ring(&mut self.nodes, z, z);
        self.len -= 1;
        if self.min.is_some() {
            self.consolidate();
        }
        self.nodes.take(z).key
    }
}

impl<K: Ord> Extend<K> for FibonacciHeap<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<K: Ord> FromIterator<K> for FibonacciHeap<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}

impl<K: Ord + fmt::Debug> fmt::Debug for FibonacciHeap<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len)
            .field("min", &self.find_min())
            .field("roots", &self.root_keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<K: Ord> crate::traits::Heap<K> for FibonacciHeap<K> {
    fn new() -> Self {
        FibonacciHeap::new()
    }

    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn push(&mut self, key: K) {
        self.insert(key);
    }

    fn peek(&self) -> Option<&K> {
        self.find_min()
    }

    fn pop(&mut self) -> Option<K> {
        self.extract_min().map(|(_, key)| key)
    }

    fn merge(&mut self, other: Self) {
        let this = mem::take(self);
        *self = this.union(other);
    }
}

impl<K: Ord> crate::traits::DecreaseKeyHeap<K> for FibonacciHeap<K> {
    type Handle = NodeRef;

    fn push_with_handle(&mut self, key: K) -> NodeRef {
        self.insert(key)
    }

    fn decrease_key(&mut self, handle: &NodeRef, new_key: K) -> Result<(), HeapError> {
        FibonacciHeap::decrease_key(self, *handle, new_key)
    }

    fn remove(&mut self, handle: &NodeRef) -> Result<K, HeapError> {
        self.delete(*handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(heap: &mut FibonacciHeap<i32>) -> Vec<i32> {
        std::iter::from_fn(|| heap.extract_min().map(|(_, key)| key)).collect()
    }

    #[test]
    fn test_basic_operations() {
        let mut heap = FibonacciHeap::new();
        assert!(heap.is_empty());
        assert_eq!(heap.len(), 0);

        heap.insert(5);
        heap.insert(3);
        heap.insert(7);

        assert_eq!(heap.len(), 3);
        assert_eq!(heap.find_min(), Some(&3));

        assert_eq!(heap.extract_min().map(|(_, k)| k), Some(3));
        assert_eq!(heap.find_min(), Some(&5));
        heap.validate().unwrap();
    }

    #[test]
    fn test_sort_extraction() {
        let mut heap: FibonacciHeap<i32> = [5, 3, 8, 1, 9, 2].into_iter().collect();
        assert_eq!(drain(&mut heap), vec![1, 2, 3, 5, 8, 9]);
        assert!(heap.is_empty());
        assert_eq!(heap.find_min(), None);
        assert_eq!(heap.extract_min(), None);
    }

    #[test]
    fn test_decrease_key() {
        let mut heap = FibonacciHeap::new();
        heap.insert(10);
        let h2 = heap.insert(20);
        let h3 = heap.insert(30);

        assert_eq!(heap.find_min(), Some(&10));

        heap.decrease_key(h2, 5).unwrap();
        assert_eq!(heap.find_min(), Some(&5));
        assert_eq!(heap.min_handle(), Some(h2));

        heap.decrease_key(h3, 1).unwrap();
        assert_eq!(heap.find_min(), Some(&1));
        heap.validate().unwrap();
    }

    #[test]
    fn test_decrease_key_rejects_increase() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(10);
        heap.insert(4);

        assert_eq!(heap.decrease_key(h, 11), Err(HeapError::KeyIncrease));
        assert_eq!(heap.key(h), Ok(&10));
        assert_eq!(heap.decrease_key(h, 10), Ok(()));
        assert_eq!(heap.key(h), Ok(&10));
    }

    #[test]
    fn test_union() {
        let heap1: FibonacciHeap<i32> = [4, 7].into_iter().collect();
        let heap2: FibonacciHeap<i32> = [2, 9].into_iter().collect();

        let mut merged = heap1.union(heap2);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.find_min(), Some(&2));
        merged.validate().unwrap();
        assert_eq!(drain(&mut merged), vec![2, 4, 7, 9]);
    }

    #[test]
    fn test_union_with_empty() {
        let heap: FibonacciHeap<i32> = [3, 1].into_iter().collect();
        let merged = FibonacciHeap::new().union(heap);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.find_min(), Some(&1));

        let merged = merged.union(FibonacciHeap::new());
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.root_count(), 2);
    }

    #[test]
    fn test_delete() {
        let mut heap = FibonacciHeap::new();
        let handles: Vec<_> = (0..10).map(|k| heap.insert(k)).collect();
        heap.extract_min();

        assert_eq!(heap.delete(handles[6]), Ok(6));
        assert!(!heap.contains(handles[6]));
        assert_eq!(heap.delete(handles[6]), Err(HeapError::InvalidHandle));
        heap.validate().unwrap();
        assert_eq!(drain(&mut heap), vec![1, 2, 3, 4, 5, 7, 8, 9]);
    }

    #[test]
    fn test_extracted_handle_is_invalid() {
        let mut heap = FibonacciHeap::new();
        let h = heap.insert(1);
        heap.insert(2);
        let (extracted, key) = heap.extract_min().unwrap();
        assert_eq!((extracted, key), (h, 1));
        assert_eq!(heap.decrease_key(h, 0), Err(HeapError::InvalidHandle));
        assert_eq!(heap.key(h), Err(HeapError::InvalidHandle));
    }

    #[test]
    fn test_root_keys_start_at_min() {
        let heap: FibonacciHeap<i32> = [4, 2, 6].into_iter().collect();
        let roots: Vec<_> = heap.root_keys().copied().collect();
        assert_eq!(roots[0], 2);
        assert_eq!(roots.len(), 3);
    }

    #[test]
    fn test_clear_and_dispose() {
        let mut heap: FibonacciHeap<i32> = (0..20).collect();
        let h = heap.insert(100);
        heap.extract_min();
        assert_eq!(heap.clear(), 20);
        assert!(heap.is_empty());
        assert!(!heap.contains(h));

        heap.extend([3, 2, 1]);
        heap.extract_min();
        assert_eq!(heap.dispose(), 2);
    }
}
